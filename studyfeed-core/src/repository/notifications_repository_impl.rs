use super::{
    dto::{NewNotification, Notification, UpsertOutcome},
    entity::NotificationEntity,
    Error, NotificationsRepository,
};
use axum::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{
    error::ErrorKind,
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

const NOTIFICATIONS: &str = "notifications";
const INDEX_NAME_AGGREGATION: &str = "index_user_id_aggregation_key_updated_at";
const INDEX_NAME_UNREAD: &str = "index_user_id_is_read";

pub struct NotificationsRepositoryImpl {
    database: Database,
}

impl NotificationsRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        database.create_collection(NOTIFICATIONS).await?;

        let collection = database.collection::<Document>(NOTIFICATIONS);
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_AGGREGATION.to_string()) {
            Self::create_aggregation_index(&collection).await?;
            tracing::debug!("created index {NOTIFICATIONS}.{INDEX_NAME_AGGREGATION}");
        }
        if !index_names.contains(&INDEX_NAME_UNREAD.to_string()) {
            Self::create_unread_index(&collection).await?;
            tracing::debug!("created index {NOTIFICATIONS}.{INDEX_NAME_UNREAD}");
        }

        Ok(Self { database })
    }

    async fn create_aggregation_index(
        collection: &Collection<Document>,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! {
                "user_id": 1,
                "aggregation_key": 1,
                "updated_at": -1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME_AGGREGATION.to_string())
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }

    async fn create_unread_index(
        collection: &Collection<Document>,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! {
                "user_id": 1,
                "is_read": 1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME_UNREAD.to_string())
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }

    fn collection(&self) -> Collection<NotificationEntity> {
        self.database.collection(NOTIFICATIONS)
    }

    async fn insert_entity(
        &self,
        notification: NewNotification,
        now: OffsetDateTime,
    ) -> Result<Notification, Error> {
        let entity = NotificationEntity {
            id: None,
            user_id: notification.user_id.into(),
            kind: notification.kind.as_ref().to_string(),
            aggregation_key: notification.aggregation_key,
            content_type: notification
                .payload
                .content_type
                .map(|content_type| content_type.as_ref().to_string()),
            content_id: notification.payload.content_id.map(Into::into),
            creator_id: notification.payload.creator_id.map(Into::into),
            title: notification.payload.title,
            subject_name: notification.payload.subject_name,
            count: 1,
            url: notification.url,
            is_read: false,
            created_at: DateTime::from(now),
            updated_at: DateTime::from(now),
        };

        let insert_result = self.collection().insert_one(&entity).await?;

        let Bson::ObjectId(id) = insert_result.inserted_id else {
            tracing::error!("invalid type of inserted '_id'");
            return Err(Error::Mongo(
                ErrorKind::Custom(Arc::new("invalid type of inserted '_id'")).into(),
            ));
        };

        let entity = NotificationEntity {
            id: Some(id),
            ..entity
        };

        entity.try_into()
    }
}

#[async_trait]
impl NotificationsRepository for NotificationsRepositoryImpl {
    async fn upsert_aggregated(
        &self,
        notification: NewNotification,
        window_start: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<UpsertOutcome, Error> {
        let Some(aggregation_key) = notification.aggregation_key.clone() else {
            return Err(Error::InvalidDocument(
                "aggregated notification without aggregation key",
            ));
        };

        // The conditional update is the whole open-window decision:
        // a record modified here was open at commit time.
        let merged = self
            .collection()
            .find_one_and_update(
                doc! {
                    "user_id": bson::Uuid::from(notification.user_id),
                    "aggregation_key": &aggregation_key,
                    "updated_at": { "$gte": DateTime::from(window_start) },
                },
                doc! {
                    "$inc": { "count": 1 },
                    "$set": {
                        "updated_at": DateTime::from(now),
                        "is_read": false,
                        "content_id": notification.payload.content_id.map(bson::Uuid::from),
                        "title": notification.payload.title.clone(),
                        "subject_name": notification.payload.subject_name.clone(),
                    },
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        match merged {
            Some(entity) => Ok(UpsertOutcome::Updated(entity.try_into()?)),
            None => {
                let inserted = self.insert_entity(notification, now).await?;
                Ok(UpsertOutcome::Inserted(inserted))
            }
        }
    }

    async fn insert(
        &self,
        notification: NewNotification,
        now: OffsetDateTime,
    ) -> Result<Notification, Error> {
        self.insert_entity(notification, now).await
    }

    async fn find_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Notification>, Error> {
        let entities = self
            .collection()
            .find(doc! { "user_id": bson::Uuid::from(user_id) })
            .sort(doc! { "updated_at": -1 })
            .limit(limit)
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        entities
            .into_iter()
            .map(Notification::try_from)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<u64, Error> {
        let count = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .count_documents(doc! {
                "user_id": bson::Uuid::from(user_id),
                "is_read": false,
            })
            .await?;

        Ok(count)
    }

    async fn mark_read(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_one(
                doc! {
                    "_id": id,
                    "user_id": bson::Uuid::from(user_id),
                },
                doc! {
                    "$set": { "is_read": true },
                },
            )
            .await?;

        match update_result.matched_count {
            0 => Err(Error::NoDocumentUpdated),
            _ => Ok(()),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<(), Error> {
        self.database
            .collection::<Document>(NOTIFICATIONS)
            .update_many(
                doc! {
                    "user_id": bson::Uuid::from(user_id),
                    "is_read": false,
                },
                doc! {
                    "$set": { "is_read": true },
                },
            )
            .await?;

        Ok(())
    }

    async fn delete(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error> {
        let delete_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .delete_one(doc! {
                "_id": id,
                "user_id": bson::Uuid::from(user_id),
            })
            .await?;

        match delete_result.deleted_count {
            0 => Err(Error::NoDocumentUpdated),
            _ => Ok(()),
        }
    }
}
