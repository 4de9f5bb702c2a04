use thiserror::Error;

#[derive(Debug, Error)]
pub enum IpfolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, IpfolioError>;
