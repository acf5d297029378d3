//! Side-by-side comparison of two cultural concepts
//!
//! Both concepts are answered by the same query pipeline; the two calls run
//! concurrently and the comparison is all-or-nothing.

use crate::backend::QueryBackend;
use crate::error::{Result, SessionError};
use griot_core::AnswerResult;
use tracing::info;

/// One concept and the answer the service gave for it
#[derive(Debug, Clone)]
pub struct ComparisonSide {
    pub concept: String,
    pub answer: AnswerResult,
}

/// A completed two-concept comparison
#[derive(Debug, Clone)]
pub struct Comparison {
    pub first: ComparisonSide,
    pub second: ComparisonSide,
}

/// Query two concepts concurrently for side-by-side display.
///
/// Empty concept names are rejected before any network call. Either query
/// failing fails the whole comparison; there is no partial result.
pub async fn compare_concepts<B: QueryBackend>(
    backend: &B,
    first: &str,
    second: &str,
) -> Result<Comparison> {
    if first.trim().is_empty() || second.trim().is_empty() {
        return Err(SessionError::Validation(
            "two concepts are needed for a comparison".into(),
        ));
    }

    info!("Comparing '{}' with '{}'", first, second);

    // No ordering guarantee between the two queries
    let (first_answer, second_answer) = tokio::join!(backend.query(first), backend.query(second));

    Ok(Comparison {
        first: ComparisonSide {
            concept: first.to_string(),
            answer: first_answer?,
        },
        second: ComparisonSide {
            concept: second.to_string(),
            answer: second_answer?,
        },
    })
}
