//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Service error: {0}")]
    Client(#[from] griot_client::ClientError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("A submission is already in flight")]
    Busy,

    #[error("This session has finished; start a new one to ask again")]
    SessionFinished,

    #[error("Nothing to submit: enter a question or attach an image")]
    EmptySubmission,
}

impl SessionError {
    /// The inline message sessions record for the user
    pub fn detail(&self) -> String {
        match self {
            SessionError::Client(e) => e.detail(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
