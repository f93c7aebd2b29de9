#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("api request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("unexpected api response: {0}")]
    UnexpectedResponse(&'static str),
}
