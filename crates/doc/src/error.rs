//! Document model error types

use thiserror::Error;

/// Document operation result type
pub type DocResult<T> = Result<T, DocError>;

/// Document model errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocError {
    #[error("stale node handle: {0}")]
    StaleHandle(u32),

    #[error("node is not an element")]
    NotAnElement,
}
