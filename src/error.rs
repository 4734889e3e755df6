//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Errors reported by index construction and queries.
///
/// Lenient conditions (levels out of range, points outside every region,
/// unreachable nodes) are not errors; they produce empty results instead.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum IndexError {
    /// An argument or the input point set cannot be processed.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: &'static str,
    },
}

impl IndexError {
    pub(crate) const fn invalid(reason: &'static str) -> Self {
        IndexError::InvalidInput { reason }
    }
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, IndexError>;
