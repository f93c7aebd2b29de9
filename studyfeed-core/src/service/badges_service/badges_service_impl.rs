use super::BadgesService;
use crate::{error::Error, repository::BadgesRepository};
use axum::async_trait;
use notify_wire::BadgeGrant;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct BadgesServiceImpl {
    repository: Arc<dyn BadgesRepository>,
}

impl BadgesServiceImpl {
    pub fn new(repository: Arc<dyn BadgesRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BadgesService for BadgesServiceImpl {
    #[tracing::instrument(name = "Badges", skip_all, fields(user_id = %user_id))]
    async fn find_user_badges(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error> {
        tracing::info!("finding user badges");

        let badges = self.repository.find_all(user_id).await?;

        Ok(badges)
    }

    #[tracing::instrument(name = "Badges", skip_all, fields(user_id = %user_id))]
    async fn find_unnotified_badges(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error> {
        tracing::info!("finding unnotified badges");

        let badges = self.repository.find_unnotified(user_id).await?;

        Ok(badges)
    }

    #[tracing::instrument(
        name = "Badges",
        skip_all,
        fields(user_id = %user_id, count = badge_ids.len())
    )]
    async fn acknowledge_badges(
        &self,
        user_id: Uuid,
        badge_ids: Vec<String>,
    ) -> Result<(), Error> {
        tracing::info!("acknowledging badges");

        let now = OffsetDateTime::now_utc();

        for badge_id in badge_ids {
            let claimed = self
                .repository
                .claim_notified(user_id, &badge_id, now)
                .await?;
            if !claimed {
                tracing::debug!(badge_id, "badge already acknowledged");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::MockBadgesRepository;

    #[tokio::test]
    async fn acknowledge_badges_claims_every_id() {
        let user_id = Uuid::new_v4();
        let mut repository = MockBadgesRepository::new();
        repository
            .expect_claim_notified()
            .times(3)
            .returning(|_, _, _| Ok(true));
        let service = BadgesServiceImpl::new(Arc::new(repository));

        let result = service
            .acknowledge_badges(
                user_id,
                vec![
                    "early-bird".to_string(),
                    "streak-7".to_string(),
                    "first-deck".to_string(),
                ],
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn acknowledge_badges_already_claimed_is_ok() {
        let mut repository = MockBadgesRepository::new();
        repository
            .expect_claim_notified()
            .returning(|_, _, _| Ok(false));
        let service = BadgesServiceImpl::new(Arc::new(repository));

        let result = service
            .acknowledge_badges(Uuid::new_v4(), vec!["streak-7".to_string()])
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn find_unnotified_badges_passes_through() {
        let user_id = Uuid::new_v4();
        let mut repository = MockBadgesRepository::new();
        repository.expect_find_unnotified().returning(move |_| {
            Ok(vec![BadgeGrant {
                user_id,
                badge_id: "streak-7".to_string(),
                earned_at: OffsetDateTime::now_utc(),
                notified_at: None,
            }])
        });
        let service = BadgesServiceImpl::new(Arc::new(repository));

        let badges = service.find_unnotified_badges(user_id).await.unwrap();

        assert_eq!(badges.len(), 1);
        assert!(!badges[0].is_notified());
    }
}
