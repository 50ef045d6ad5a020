//! The adapter-level error type.

use recast_core::{DecodeError, EncodeError, SinkError, SourceError};
use thiserror::Error;

/// Any failure a scan or print stage can produce.
///
/// Engine errors pass through unchanged; the body-document codec
/// contributes its own error type.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// Decoding a record from a source failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Encoding a record into a sink failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A source adapter could not parse its transport data.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A sink adapter could not deliver to its transport.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The body document failed to serialize or deserialize.
    #[error("body document error: {0}")]
    Json(#[from] serde_json::Error),
}
