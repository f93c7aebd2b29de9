use super::{entity::BadgeGrantEntity, BadgesRepository, Error};
use axum::async_trait;
use bson::{doc, Bson, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use notify_wire::BadgeGrant;
use time::OffsetDateTime;
use uuid::Uuid;

const BADGE_GRANTS: &str = "badge_grants";

pub struct BadgesRepositoryImpl {
    database: Database,
}

impl BadgesRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        database.create_collection(BADGE_GRANTS).await?;

        Ok(Self { database })
    }

    fn collection(&self) -> Collection<BadgeGrantEntity> {
        self.database.collection(BADGE_GRANTS)
    }

    async fn find(&self, filter: Document) -> Result<Vec<BadgeGrant>, Error> {
        let entities = self
            .collection()
            .find(filter)
            .sort(doc! { "earned_at": 1 })
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        Ok(entities.into_iter().map(BadgeGrant::from).collect())
    }
}

#[async_trait]
impl BadgesRepository for BadgesRepositoryImpl {
    async fn find_unnotified(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error> {
        self.find(doc! {
            "user_id": bson::Uuid::from(user_id),
            "notified_at": Bson::Null,
        })
        .await
    }

    async fn find_all(&self, user_id: Uuid) -> Result<Vec<BadgeGrant>, Error> {
        self.find(doc! { "user_id": bson::Uuid::from(user_id) })
            .await
    }

    async fn claim_notified(
        &self,
        user_id: Uuid,
        badge_id: &str,
        now: OffsetDateTime,
    ) -> Result<bool, Error> {
        // The notified_at filter makes the claim atomic: exactly one
        // concurrent caller matches, everyone else no-ops.
        let update_result = self
            .database
            .collection::<Document>(BADGE_GRANTS)
            .update_one(
                doc! {
                    "user_id": bson::Uuid::from(user_id),
                    "badge_id": badge_id,
                    "notified_at": Bson::Null,
                },
                doc! {
                    "$set": { "notified_at": DateTime::from(now) },
                },
            )
            .await?;

        Ok(update_result.modified_count > 0)
    }
}
