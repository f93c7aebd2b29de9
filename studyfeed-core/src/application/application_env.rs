use crate::auth::{parse_jwt_algorithms, parse_jwt_key};
use anyhow::anyhow;
use jsonwebtoken::{Algorithm, DecodingKey};
use std::{net::SocketAddr, time::Duration};

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub bind_address: SocketAddr,

    pub db_connection_string: String,
    pub db_name: String,

    /// Algorithms must belong to the same family
    pub jwt_algorithms: Vec<Algorithm>,
    pub jwt_key: DecodingKey,

    pub aggregation_window: Duration,

    pub default_list_limit: i64,
    pub max_list_limit: i64,

    pub max_http_content_len: usize,

    pub websocket_ping_interval: Duration,
    pub websocket_channel_capacity: usize,

    pub push_timeout: Duration,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("STUDYFEED_CORE_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("STUDYFEED_CORE_LOG_FILENAME")?;
        let bind_address = Self::env_var("STUDYFEED_CORE_BIND_ADDRESS")?.parse()?;
        let db_connection_string = Self::env_var("STUDYFEED_CORE_DB_CONNECTION_STRING")?;
        let db_name = Self::env_var("STUDYFEED_CORE_DB_NAME")?;
        let jwt_algorithms = parse_jwt_algorithms(Self::env_var("STUDYFEED_CORE_JWT_ALGORITHMS")?)?;
        let jwt_algorithm = jwt_algorithms.first().ok_or(anyhow!(
            "STUDYFEED_CORE_JWT_ALGORITHMS need to contain at least one algorithm"
        ))?;
        let jwt_key = parse_jwt_key(jwt_algorithm, Self::env_var("STUDYFEED_CORE_JWT_KEY")?)?;
        let aggregation_window = Duration::from_secs(
            Self::env_var("STUDYFEED_CORE_AGGREGATION_WINDOW_SECONDS")?.parse()?,
        );
        let default_list_limit = Self::env_var("STUDYFEED_CORE_DEFAULT_LIST_LIMIT")?.parse()?;
        let max_list_limit = Self::env_var("STUDYFEED_CORE_MAX_LIST_LIMIT")?.parse()?;
        let max_http_content_len = Self::env_var("STUDYFEED_CORE_MAX_HTTP_CONTENT_LEN")?.parse()?;
        let websocket_ping_interval = Duration::from_secs(
            Self::env_var("STUDYFEED_CORE_WEBSOCKET_PING_INTERVAL_SECONDS")?.parse()?,
        );
        let websocket_channel_capacity =
            Self::env_var("STUDYFEED_CORE_WEBSOCKET_CHANNEL_CAPACITY")?.parse()?;
        let push_timeout =
            Duration::from_secs(Self::env_var("STUDYFEED_CORE_PUSH_TIMEOUT_SECONDS")?.parse()?);

        Ok(Self {
            log_directory,
            log_filename,
            bind_address,
            db_connection_string,
            db_name,
            jwt_algorithms,
            jwt_key,
            aggregation_window,
            default_list_limit,
            max_list_limit,
            max_http_content_len,
            websocket_ping_interval,
            websocket_channel_capacity,
            push_timeout,
        })
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }
}
