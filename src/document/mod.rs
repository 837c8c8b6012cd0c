//! Typed documents: decoding, body rendering, tag aggregation, text helpers.

pub mod render;
pub mod tags;
pub mod text;
pub mod types;

use serde::Serialize;

use crate::error::{Error, Result};

pub use render::render_body;
pub use tags::aggregate_tags;
pub use types::{Article, Document, Letter, Project, ReadingListEntry, Record};

/// Decode one object's bytes into a typed record.
///
/// Structural deserialization by field tag, then the type's own validation.
/// There are no partial results: on error the caller discards everything.
pub fn decode<T: Record>(bytes: &[u8], key: &str) -> Result<T> {
    let record: T =
        serde_yaml::from_slice(bytes).map_err(|err| Error::Decode(format!("{key}: {err}")))?;
    record.validate()?;
    Ok(record)
}

/// Encode a value as a YAML document for the write path.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|err| Error::Decode(err.to_string()))
}
