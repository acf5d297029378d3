//! HTTP boundary to the cultural-knowledge service
//!
//! Everything the backend does (answering questions, transcription, image
//! analysis, storage) sits behind a fixed HTTP+JSON interface; this crate is
//! the only place that interface is spoken.

pub mod api;
pub mod error;
pub mod status;

pub use api::ServiceClient;
pub use error::{ClientError, Result};
pub use status::{AgentInfo, AgentNetworkStatus, StatusPoller};
