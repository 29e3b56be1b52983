//! Domain-level errors.
//!
//! These errors represent invalid domain values. They are independent of
//! transport concerns (HTTP, remote inference).

use thiserror::Error;

/// Domain-specific errors for rejected values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown input mode
    #[error("Unsupported input mode '{0}' (expected 'Text' or 'Audio')")]
    InvalidMode(String),

    /// Unknown speech output language
    #[error("Unsupported speech language '{0}' (expected 'yoruba' or 'hausa')")]
    InvalidLanguage(String),
}
