//! Errors surfaced while starting a traversal.

use std::collections::TryReserveError;

use thiserror::Error;

/// An error returned by [`Session::parse`](crate::Session::parse) or
/// [`Session::parse_in_place`](crate::Session::parse_in_place).
///
/// All malformed-input errors surface from `parse`: the underlying reader
/// validates the whole document while building its tape, so
/// [`Traversal::resume`](crate::Traversal::resume) is infallible.
/// Structured-data errors are not transient; the only useful next call on
/// the session after an error is another `parse`.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The reader rejected the bytes as not well-formed JSON. The message
    /// carries the reader's description, including a byte-offset hint
    /// where one is available.
    #[error("malformed input: {0}")]
    Malformed(#[from] simd_json::Error),

    /// Allocating the session-owned defensive copy of the input failed.
    #[error("input copy allocation failed: {0}")]
    BufferAlloc(#[from] TryReserveError),
}
