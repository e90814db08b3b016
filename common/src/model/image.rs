use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical representation of one stored image, whichever backend dialect
/// produced it.
///
/// Records are built by the `normalize` module and are never edited in place
/// afterwards: a refreshed read produces new records that replace the old ones
/// wholesale (see `model::snapshot::CatalogSnapshot`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Opaque identifier, unique within one snapshot.
    ///
    /// The structured backend supplies it directly. The markup backend has no
    /// identifiers, so the file name stands in for it (which is also what its
    /// `/view/{filename}` route expects).
    pub id: String,
    /// Display name, usually the original file name.
    pub name: String,
    /// Location the binary content can be fetched from. Always present.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<UploadedAt>,
    /// Tag names in the order the backend listed them, without duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ImageRecord {
    /// Builds a record carrying only the fields every dialect can supply.
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            content_type: None,
            size: None,
            uploaded_at: None,
            tags: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// First `limit` tags, in display order.
    pub fn leading_tags(&self, limit: usize) -> &[String] {
        &self.tags[..self.tags.len().min(limit)]
    }
}

/// Size information as supplied by the backend.
///
/// The structured backend reports a byte count. The markup backend renders a
/// human-readable label whose format is owned by its template, so it is kept
/// verbatim and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSize {
    Bytes(u64),
    Label(String),
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::Bytes(bytes) => write!(f, "{:.2} KB", *bytes as f64 / 1024.0),
            ImageSize::Label(label) => f.write_str(label),
        }
    }
}

/// Upload timestamp: an instant when the backend sent RFC 3339, otherwise the
/// raw text it sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadedAt {
    Instant(DateTime<Utc>),
    Raw(String),
}

impl UploadedAt {
    /// Interprets a structured-dialect timestamp. Unparseable input is kept raw.
    pub fn from_wire(value: &str) -> Self {
        match DateTime::parse_from_rfc3339(value) {
            Ok(instant) => UploadedAt::Instant(instant.with_timezone(&Utc)),
            Err(_) => UploadedAt::Raw(value.to_string()),
        }
    }
}

impl fmt::Display for UploadedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadedAt::Instant(instant) => write!(f, "{}", instant.format("%Y-%m-%d %H:%M:%S")),
            UploadedAt::Raw(raw) => f.write_str(raw),
        }
    }
}
