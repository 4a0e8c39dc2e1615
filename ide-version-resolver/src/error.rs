use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain the latest stable version from the update feed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("update feed answered with status {0}")]
    Status(StatusCode),

    #[error("malformed update feed: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("update feed has no build version under {0}")]
    MissingNode(String),
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("no cached IDE version available and the update feed failed")]
    CacheMiss(#[source] FetchError),

    #[error("an I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IDE version must not be empty")]
    EmptyVersionSpec,

    #[error("no IDE version configured, pass --ide-version or a properties file defining pluginIdeaVersion")]
    MissingVersionSpec,

    #[error("invalid value '{value}' for property {key}")]
    InvalidProperty { key: String, value: String },
}
