use crate::reconciliation::EngineCommand;
use futures_util::StreamExt;
use notify_wire::RealtimeMessage;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::header::AUTHORIZATION, Message},
};

#[derive(Debug, Clone)]
pub struct RealtimeSubscriberConfig {
    pub websocket_url: String,
    pub bearer_token: String,
    pub reconnect_interval: Duration,
}

///
/// Maintains the websocket connection to the realtime channel and
/// forwards change events into the reconciliation engine. Every
/// (re)connect emits `Reconnected` first, the engine refetches to
/// cover whatever was missed while offline.
///
pub struct RealtimeSubscriber {
    task: Option<JoinHandle<()>>,
}

impl RealtimeSubscriber {
    pub fn new(
        config: RealtimeSubscriberConfig,
        commands_tx: mpsc::Sender<EngineCommand>,
    ) -> Self {
        let task = tokio::spawn(async move {
            run(config, commands_tx).await;
        });

        Self { task: Some(task) }
    }

    pub async fn close(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for RealtimeSubscriber {
    ///
    /// Dropping the handle aborts the connection loop, `close` is only
    /// needed to also await its termination.
    ///
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

async fn run(config: RealtimeSubscriberConfig, commands_tx: mpsc::Sender<EngineCommand>) {
    loop {
        match connect(&config).await {
            Ok(websocket) => {
                tracing::info!("realtime channel connected");

                if commands_tx.send(EngineCommand::Reconnected).await.is_err() {
                    return;
                }

                forward_events(websocket, &commands_tx).await;
                tracing::info!("realtime channel disconnected");
            }
            Err(err) => {
                tracing::warn!(%err, "realtime channel connect failed");
            }
        }

        tokio::time::sleep(config.reconnect_interval).await;
    }
}

async fn connect(
    config: &RealtimeSubscriberConfig,
) -> anyhow::Result<
    tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
> {
    let mut request = config.websocket_url.as_str().into_client_request()?;
    request.headers_mut().insert(
        AUTHORIZATION,
        format!("Bearer {}", config.bearer_token).parse()?,
    );

    let (websocket, _) = connect_async(request).await?;

    Ok(websocket)
}

async fn forward_events<S>(mut websocket: S, commands_tx: &mpsc::Sender<EngineCommand>)
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(message) = websocket.next().await {
        let message = match message {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(%err, "realtime channel error");
                return;
            }
        };

        let Message::Text(text) = message else {
            continue;
        };

        // A frame the session cannot parse must never kill the
        // connection, newer servers may emit new event shapes.
        let Ok(message) = serde_json::from_str::<RealtimeMessage>(&text) else {
            tracing::warn!(frame = text, "ignoring unparseable realtime frame");
            continue;
        };

        if commands_tx
            .send(EngineCommand::Realtime(message))
            .await
            .is_err()
        {
            return;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures_util::stream;
    use notify_wire::RealtimeEvent;

    #[tokio::test]
    async fn forward_events_parses_and_forwards() {
        let frame = r#"{"table":"notifications","op":"UPDATE","id":"abc"}"#;
        let websocket = stream::iter(vec![Ok(Message::Text(frame.to_string()))]);
        let (commands_tx, mut commands_rx) = mpsc::channel(8);

        forward_events(websocket, &commands_tx).await;

        let command = commands_rx.try_recv().unwrap();
        match command {
            EngineCommand::Realtime(message) => {
                assert_eq!(
                    message.event,
                    RealtimeEvent::Update {
                        id: "abc".to_string()
                    }
                );
            }
            command => panic!("unexpected command: {command:?}"),
        }
    }

    #[tokio::test]
    async fn forward_events_skips_unparseable_frames() {
        let websocket = stream::iter(vec![
            Ok(Message::Text("not json".to_string())),
            Ok(Message::Text(
                r#"{"table":"notifications","op":"UPDATE","id":"abc"}"#.to_string(),
            )),
        ]);
        let (commands_tx, mut commands_rx) = mpsc::channel(8);

        forward_events(websocket, &commands_tx).await;

        assert!(matches!(
            commands_rx.try_recv(),
            Ok(EngineCommand::Realtime(_))
        ));
        assert!(commands_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropped_handle_stops_connection_loop() {
        let (commands_tx, mut commands_rx) = mpsc::channel(8);
        let subscriber = RealtimeSubscriber::new(
            RealtimeSubscriberConfig {
                websocket_url: "ws://127.0.0.1:1".to_string(),
                bearer_token: "token".to_string(),
                reconnect_interval: Duration::from_secs(3600),
            },
            commands_tx,
        );

        drop(subscriber);

        // The task owns the only sender, the channel closing proves
        // the connection loop exited.
        assert!(commands_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn forward_events_ignores_binary_frames() {
        let websocket = stream::iter(vec![Ok(Message::Binary(vec![1, 2, 3]))]);
        let (commands_tx, mut commands_rx) = mpsc::channel(8);

        forward_events(websocket, &commands_tx).await;

        assert!(commands_rx.try_recv().is_err());
    }
}
