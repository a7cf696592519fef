use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("backend returned no record")]
    EmptyResponse,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
