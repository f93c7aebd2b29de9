use super::ApplicationEnv;
use crate::{
    repository::{
        BadgesRepositoryImpl, NotificationsRepositoryImpl, PushSubscriptionsRepositoryImpl,
    },
    service::{
        aggregation_service::{
            AggregationService, AggregationServiceConfig, AggregationServiceImpl,
        },
        audience_service::AudienceServiceImpl,
        badges_service::{BadgesService, BadgesServiceImpl},
        fanout_service::FanoutServiceImpl,
        notifications_service::{
            NotificationsService, NotificationsServiceConfig, NotificationsServiceImpl,
        },
        push_gateway::HttpPushGateway,
        websockets_service::{WebSocketsService, WebSocketsServiceConfig, WebSocketsServiceImpl},
    },
};
use axum::extract::FromRef;
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct ApplicationState {
    pub aggregation_service: Arc<dyn AggregationService>,
    pub notifications_service: Arc<dyn NotificationsService>,
    pub badges_service: Arc<dyn BadgesService>,
    pub websockets_service: Arc<dyn WebSocketsService>,
}

pub struct ApplicationStateToClose {
    pub db_client: Client,
    pub websockets_service: Arc<dyn WebSocketsService>,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("connecting to database");
    let db_client_options = ClientOptions::parse(&env.db_connection_string).await?;
    let db_client = Client::with_options(db_client_options)?;
    let db = db_client.database(&env.db_name);

    tracing::info!("creating repositories");
    let notifications_repository = NotificationsRepositoryImpl::new(db.clone()).await?;
    let notifications_repository = Arc::new(notifications_repository);

    let badges_repository = BadgesRepositoryImpl::new(db.clone()).await?;
    let badges_repository = Arc::new(badges_repository);

    let push_subscriptions_repository = PushSubscriptionsRepositoryImpl::new(db.clone());
    let push_subscriptions_repository = Arc::new(push_subscriptions_repository);

    tracing::info!("creating services");
    let config = WebSocketsServiceConfig {
        ping_interval: env.websocket_ping_interval,
        channel_capacity: env.websocket_channel_capacity,
    };
    let websockets_service = WebSocketsServiceImpl::new(config);
    let websockets_service = Arc::new(websockets_service);

    let push_gateway = HttpPushGateway::new(env.push_timeout)?;
    let push_gateway = Arc::new(push_gateway);

    let fanout_service = FanoutServiceImpl::new(
        websockets_service.clone(),
        push_subscriptions_repository,
        push_gateway,
    );
    let fanout_service = Arc::new(fanout_service);

    let audience_service = AudienceServiceImpl::new(db);
    let audience_service = Arc::new(audience_service);

    let config = AggregationServiceConfig {
        aggregation_window: env.aggregation_window,
    };
    let aggregation_service = AggregationServiceImpl::new(
        config,
        notifications_repository.clone(),
        audience_service,
        fanout_service,
    );
    let aggregation_service = Arc::new(aggregation_service);

    let config = NotificationsServiceConfig {
        default_list_limit: env.default_list_limit,
        max_list_limit: env.max_list_limit,
    };
    let notifications_service = NotificationsServiceImpl::new(config, notifications_repository);
    let notifications_service = Arc::new(notifications_service);

    let badges_service = BadgesServiceImpl::new(badges_repository);
    let badges_service = Arc::new(badges_service);

    Ok((
        ApplicationState {
            aggregation_service,
            notifications_service,
            badges_service,
            websockets_service: websockets_service.clone(),
        },
        ApplicationStateToClose {
            db_client,
            websockets_service,
        },
    ))
}
