//! Engine error type.
//!
//! Validation findings are data, not errors; this type covers the few
//! conditions that must abort an operation, chiefly generation being
//! blocked by configuration errors. A blocked generation returns the full
//! issue list instead of embedding an error message in the program text.

use crate::issue::ValidationIssue;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// Generation refused because the configuration has blocking errors.
    #[error("generation blocked by {} configuration error(s)", errors.len())]
    GenerationBlocked {
        /// The complete list of blocking issues, in evaluation order.
        errors: Vec<ValidationIssue>,
    },

    /// The request contained no usable (non-ignored) pieces.
    #[error("no pieces to process")]
    EmptyRequest,
}

pub type Result<T> = std::result::Result<T, EngineError>;
