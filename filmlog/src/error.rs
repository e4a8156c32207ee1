//! Common error types for filmlog
//!
//! Bad user input is not an error here: the conversation engine answers it
//! with a re-prompt and stays in the current state. This enum covers the
//! failures that escape a single conversational turn.

use thiserror::Error;

/// Common result type for filmlog operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
