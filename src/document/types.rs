//! Typed document records and the capability trait they share.
//!
//! [`Document`] is the base record every content type embeds; the variants add
//! their own YAML fields on top. [`Record`] is the capability set a type needs
//! to flow through the collection assembler — explicit accessors and mutators
//! instead of any runtime field inspection, so a missing field is a compile
//! error, not a page-load surprise.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Base content record, one per remote YAML object.
///
/// `id` and `source_key` are assigned at retrieval time (positional index in
/// the listing, and the object's remote key); neither is stored remotely, so
/// neither participates in (de)serialization. Missing YAML fields decode to
/// their empty values, matching what the documents in the bucket rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(skip)]
    pub id: String,
    #[serde(skip)]
    pub source_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Capability set for participating in the collection pipeline.
pub trait Record: DeserializeOwned + Default + Send + Sync {
    /// Object-store prefix this type's documents live under, e.g. `"articles/"`.
    const PREFIX: &'static str;

    fn document(&self) -> &Document;
    fn document_mut(&mut self) -> &mut Document;

    fn id(&self) -> &str {
        &self.document().id
    }

    fn title(&self) -> &str {
        &self.document().title
    }

    fn subtitle(&self) -> &str {
        &self.document().subtitle
    }

    fn body(&self) -> &str {
        &self.document().body
    }

    fn tags(&self) -> &[String] {
        &self.document().tags
    }

    fn source_key(&self) -> &str {
        &self.document().source_key
    }

    fn set_id(&mut self, id: String) {
        self.document_mut().id = id;
    }

    fn set_body(&mut self, body: String) {
        self.document_mut().body = body;
    }

    fn set_source_key(&mut self, key: String) {
        self.document_mut().source_key = key;
    }

    /// `YYYY-MM-DD` sort key for date-bearing types. `None` means the type
    /// keeps listing order.
    fn sort_date(&self) -> Option<&str> {
        None
    }

    /// Structural checks run after deserialization, before the record enters
    /// a collection.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A dated long-form post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub date: String,
}

impl Record for Article {
    const PREFIX: &'static str = "articles/";

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn sort_date(&self) -> Option<&str> {
        Some(&self.date)
    }

    fn validate(&self) -> Result<()> {
        validate_date(&self.date)
    }
}

/// A portfolio entry pointing at a repository and a cover image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub repository: String,
    #[serde(default, rename = "image-path")]
    pub image_path: String,
}

impl Record for Project {
    const PREFIX: &'static str = "projects/";

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

/// A dated letter written for an occasion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Letter {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub occasion: String,
}

impl Record for Letter {
    const PREFIX: &'static str = "letters/";

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn sort_date(&self) -> Option<&str> {
        Some(&self.date)
    }

    fn validate(&self) -> Result<()> {
        validate_date(&self.date)
    }
}

/// A book on the reading list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingListEntry {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default, rename = "image-path")]
    pub image_path: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub status: String,
}

impl Record for ReadingListEntry {
    const PREFIX: &'static str = "reading-list/";

    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

/// Dates sort lexicographically, which is only correct for zero-padded
/// `YYYY-MM-DD`. The format is enforced here so the sort can stay a plain
/// string comparison. Empty dates are allowed and sort last.
fn validate_date(date: &str) -> Result<()> {
    if date.is_empty() {
        return Ok(());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| Error::Decode(format!("invalid date {date:?}: expected YYYY-MM-DD")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_accessors_read_the_embedded_document() {
        let mut article = Article {
            document: Document {
                title: "On Writing".into(),
                subtitle: "notes".into(),
                body: "text".into(),
                tags: vec!["craft".into()],
                ..Document::default()
            },
            date: "2024-03-01".into(),
        };

        assert_eq!(article.title(), "On Writing");
        assert_eq!(article.subtitle(), "notes");
        assert_eq!(article.body(), "text");
        assert_eq!(article.tags(), ["craft".to_string()]);
        assert_eq!(article.sort_date(), Some("2024-03-01"));

        article.set_id("3".into());
        article.set_body("<p>text</p>".into());
        article.set_source_key("articles/on-writing.yaml".into());
        assert_eq!(article.id(), "3");
        assert_eq!(article.body(), "<p>text</p>");
        assert_eq!(article.source_key(), "articles/on-writing.yaml");
    }

    #[test]
    fn projects_and_reading_list_have_no_sort_date() {
        assert_eq!(Project::default().sort_date(), None);
        assert_eq!(ReadingListEntry::default().sort_date(), None);
    }

    #[test]
    fn date_format_is_enforced() {
        assert!(validate_date("2024-03-01").is_ok());
        assert!(validate_date("").is_ok());
        assert!(validate_date("2024-3-1").is_err());
        assert!(validate_date("March 1, 2024").is_err());
        assert!(validate_date("2024-13-40").is_err());
    }
}
