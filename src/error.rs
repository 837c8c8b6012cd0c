//! Error taxonomy for the retrieval pipeline.
//!
//! Every failure mode a collection call can surface. None of these are retried
//! automatically and none terminate the process; each aborts the enclosing
//! call and propagates to the caller, which decides the user-facing response.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The bucket is missing or unreachable. Fatal to the whole request.
    #[error("object store unavailable: {0}")]
    StoreUnavailable(String),

    /// A remote key, or a document id derived from one, does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The object's bytes do not deserialize into the declared document type.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The markup converter could not produce HTML from a document body.
    #[error("render failed: {0}")]
    Render(String),

    /// Local disk failure while mirroring or reading a cached object.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller's cancellation token fired while a store call was in flight.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// `true` for the variants a best-effort listing may skip past.
    /// Cancellation always aborts the whole call.
    pub fn is_skippable(&self) -> bool {
        !matches!(self, Error::Cancelled | Error::StoreUnavailable(_))
    }
}
