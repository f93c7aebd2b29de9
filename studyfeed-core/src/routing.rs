use crate::{
    application::{ApplicationMiddleware, ApplicationState},
    auth::User,
    dto::{input, output},
    error::Error,
    service::{
        aggregation_service::AggregationService, badges_service::BadgesService,
        notifications_service::NotificationsService, websockets_service::WebSocketsService,
    },
};
use axum::{
    extract::{ConnectInfo, Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use bson::oid::ObjectId;
use notify_wire::{BadgeGrant, NotificationRecord};
use std::{net::SocketAddr, sync::Arc};

pub fn routing(application_middleware: &ApplicationMiddleware) -> Router<ApplicationState> {
    Router::new()
        .route(
            "/api/notifications/content-created",
            post(create_content_created_event),
        )
        .route("/api/notifications/friend-event", post(create_friend_event))
        .route("/api/notifications", get(get_notifications))
        .route("/api/notifications/unread-count", get(get_unread_count))
        .route("/api/notifications/read", put(put_all_notifications_read))
        .route("/api/notifications/:id/read", put(put_notification_read))
        .route("/api/notifications/:id", delete(delete_notification))
        .route("/api/badges", get(get_badges))
        .route("/api/badges/unnotified", get(get_unnotified_badges))
        .route("/api/badges/acknowledge", post(post_badges_acknowledge))
        .route("/ws", get(websocket_upgrade))
        .route_layer(application_middleware.auth.clone())
}

///
/// Ingestion is fire and forget: the caller gets 202 as soon as the
/// event is accepted, aggregation and delivery run detached.
///
async fn create_content_created_event(
    State(aggregation_service): State<Arc<dyn AggregationService>>,
    Extension(user): Extension<User>,
    Json(event): Json<input::ContentCreatedEvent>,
) -> StatusCode {
    tokio::spawn(async move {
        if let Err(err) = aggregation_service
            .ingest_content_created(user.id, event)
            .await
        {
            tracing::warn!(%err, "content-created event ingestion failed");
        }
    });

    StatusCode::ACCEPTED
}

async fn create_friend_event(
    State(aggregation_service): State<Arc<dyn AggregationService>>,
    Extension(user): Extension<User>,
    Json(event): Json<input::FriendEvent>,
) -> StatusCode {
    tokio::spawn(async move {
        if let Err(err) = aggregation_service.ingest_friend_event(user.id, event).await {
            tracing::warn!(%err, "friend event ingestion failed");
        }
    });

    StatusCode::ACCEPTED
}

async fn get_notifications(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Extension(user): Extension<User>,
    Query(query): Query<input::ListQuery>,
) -> Result<Json<Vec<NotificationRecord>>, Error> {
    let records = notifications_service
        .find_recent_notifications(user.id, query.limit)
        .await?;

    Ok(Json(records))
}

async fn get_unread_count(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Extension(user): Extension<User>,
) -> Result<Json<output::UnreadCount>, Error> {
    let count = notifications_service
        .count_unread_notifications(user.id)
        .await?;

    Ok(Json(output::UnreadCount { count }))
}

async fn put_all_notifications_read(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Extension(user): Extension<User>,
) -> Result<StatusCode, Error> {
    notifications_service
        .mark_all_notifications_read(user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn put_notification_read(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_notification_id(&id)?;

    notifications_service
        .mark_notification_read(user.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_notification(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_notification_id(&id)?;

    notifications_service.delete_notification(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn get_badges(
    State(badges_service): State<Arc<dyn BadgesService>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<BadgeGrant>>, Error> {
    let badges = badges_service.find_user_badges(user.id).await?;

    Ok(Json(badges))
}

async fn get_unnotified_badges(
    State(badges_service): State<Arc<dyn BadgesService>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<BadgeGrant>>, Error> {
    let badges = badges_service.find_unnotified_badges(user.id).await?;

    Ok(Json(badges))
}

async fn post_badges_acknowledge(
    State(badges_service): State<Arc<dyn BadgesService>>,
    Extension(user): Extension<User>,
    Json(acknowledge): Json<input::BadgeAcknowledge>,
) -> Result<StatusCode, Error> {
    badges_service
        .acknowledge_badges(user.id, acknowledge.badge_ids)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn websocket_upgrade(
    State(websockets_service): State<Arc<dyn WebSocketsService>>,
    Extension(user): Extension<User>,
    ConnectInfo(address): ConnectInfo<SocketAddr>,
    websocket: WebSocketUpgrade,
) -> Response {
    websocket.on_upgrade(move |websocket| async move {
        websockets_service
            .handle_client(user.id, address, websocket)
            .await;
    })
}

fn parse_notification_id(id: &str) -> Result<ObjectId, Error> {
    ObjectId::parse_str(id).map_err(|_| Error::Validation("invalid notification id"))
}
