use super::{
    dto::PushSubscription, entity::PushSubscriptionEntity, Error, PushSubscriptionsRepository,
};
use axum::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

const PUSH_SUBSCRIPTIONS: &str = "push_subscriptions";

pub struct PushSubscriptionsRepositoryImpl {
    database: Database,
}

impl PushSubscriptionsRepositoryImpl {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self) -> Collection<PushSubscriptionEntity> {
        self.database.collection(PUSH_SUBSCRIPTIONS)
    }
}

#[async_trait]
impl PushSubscriptionsRepository for PushSubscriptionsRepositoryImpl {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<PushSubscription>, Error> {
        let entities = self
            .collection()
            .find(doc! { "user_id": bson::Uuid::from(user_id) })
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        Ok(entities.into_iter().map(PushSubscription::from).collect())
    }
}
