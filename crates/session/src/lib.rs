//! Session state machines for the griot client
//!
//! This crate owns the interactive workflows:
//! - Capture: optional audio/image attachment lifecycle
//! - Query: enrichment, composition, and submission of one question
//! - Promotion: moving a web-sourced answer into permanent storage
//! - Comparison: answering two concepts concurrently, side by side
//!
//! All of them talk to the service through the [`QueryBackend`] seam so the
//! state machines are unit-testable without a network.

pub mod backend;
pub mod capture;
pub mod compare;
pub mod error;
pub mod promotion;
pub mod query;

pub use backend::QueryBackend;
pub use capture::{Attachment, AudioInput, CaptureController, CaptureSession};
pub use compare::{compare_concepts, Comparison, ComparisonSide};
pub use error::{Result, SessionError};
pub use promotion::{PromotionController, PromotionForm, PromotionState};
pub use query::{QueryOrchestrator, QuerySession, SessionStatus};
