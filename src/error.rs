use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuitterError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preference store error: {0}")]
    Store(String),

    #[error("Blob storage error: {0}")]
    Blob(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Anyhow error: {0}")]
    Anyhow(String),
}

impl From<serde_json::Error> for SuitterError {
    fn from(err: serde_json::Error) -> Self {
        SuitterError::Json(err.to_string())
    }
}

impl From<io::Error> for SuitterError {
    fn from(err: io::Error) -> Self {
        SuitterError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for SuitterError {
    fn from(err: reqwest::Error) -> Self {
        SuitterError::Rpc(err.to_string())
    }
}

impl From<anyhow::Error> for SuitterError {
    fn from(err: anyhow::Error) -> Self {
        SuitterError::Anyhow(err.to_string())
    }
}
