use super::AudienceService;
use crate::{dto::input::Visibility, repository};
use axum::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::Database;
use serde::Deserialize;
use std::collections::HashSet;
use uuid::Uuid;

const ENROLLMENTS: &str = "enrollments";
const FRIENDSHIPS: &str = "friendships";

#[derive(Debug, Deserialize)]
struct EnrollmentEntity {
    user_id: bson::Uuid,
}

#[derive(Debug, Deserialize)]
struct FriendshipEntity {
    friend_id: bson::Uuid,
}

pub struct AudienceServiceImpl {
    database: Database,
}

impl AudienceServiceImpl {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    async fn enrolled_users(&self, course_id: &str) -> Result<Vec<Uuid>, repository::Error> {
        let entities = self
            .database
            .collection::<EnrollmentEntity>(ENROLLMENTS)
            .find(doc! { "course_id": course_id })
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| entity.user_id.into())
            .collect())
    }

    async fn friends_of(&self, user_id: Uuid) -> Result<HashSet<Uuid>, repository::Error> {
        let entities = self
            .database
            .collection::<FriendshipEntity>(FRIENDSHIPS)
            .find(doc! { "user_id": bson::Uuid::from(user_id) })
            .await?
            .try_collect::<Vec<_>>()
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| entity.friend_id.into())
            .collect())
    }
}

#[async_trait]
impl AudienceService for AudienceServiceImpl {
    async fn content_audience(
        &self,
        creator_id: Uuid,
        visibility: Visibility,
        target_course: &str,
    ) -> Result<Vec<Uuid>, repository::Error> {
        let enrolled = self.enrolled_users(target_course).await?;

        let audience = match visibility {
            Visibility::Public => enrolled
                .into_iter()
                .filter(|user_id| *user_id != creator_id)
                .collect(),
            Visibility::Friends => {
                let friends = self.friends_of(creator_id).await?;
                enrolled
                    .into_iter()
                    .filter(|user_id| *user_id != creator_id && friends.contains(user_id))
                    .collect()
            }
        };

        Ok(audience)
    }
}
