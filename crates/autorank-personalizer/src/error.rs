use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed to read credentials file {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("credentials file {0:?} is empty")]
    Empty(std::path::PathBuf),
    #[error("credentials line must look like 'label:key'")]
    Malformed,
}

pub type Result<T> = std::result::Result<T, ServiceError>;
