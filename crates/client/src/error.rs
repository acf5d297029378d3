//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service error ({status}): {detail}")]
    Service { status: u16, detail: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// The human-readable message the UI should surface
    pub fn detail(&self) -> String {
        match self {
            ClientError::Service { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
