//! Response Normalizer: turns whatever a backend dialect answered with into
//! canonical `ImageRecord` and `TagRecord` values.
//!
//! Responsibilities
//! - Decide once, in `RawResponse::from_reply`, whether a payload is JSON or
//!   markup. Everything downstream matches on that tag.
//! - List normalization never fails. Items that cannot become a record are
//!   skipped and reported as `Diagnostic`s; payloads that are not lists at all
//!   normalize to nothing.
//! - Single-item normalization does fail, with a `NormalizeError`.
//! - Everything here is a pure function of the payload and the configured base
//!   URL. No I/O, no logging.

use crate::client::ApiReply;
use crate::error::NormalizeError;
use crate::model::image::ImageRecord;
use crate::model::tag::TagRecord;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use url::Url;

mod json;
mod markup;

#[cfg(test)]
mod tests;

/// A backend payload, tagged by format.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Json(Value),
    Markup(String),
}

impl RawResponse {
    /// Classifies a reply body. An HTML content type wins; without one, a
    /// body starting with `<` is treated as markup. An empty body is JSON
    /// `null`, which every list normalizes to nothing.
    pub fn from_reply(reply: &ApiReply) -> Result<Self, NormalizeError> {
        Self::classify(reply.content_type.as_deref(), &reply.body)
    }

    pub fn classify(content_type: Option<&str>, body: &str) -> Result<Self, NormalizeError> {
        let trimmed = body.trim_start();
        let is_html = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("html"))
            .unwrap_or(false);

        if is_html || trimmed.starts_with('<') {
            return Ok(RawResponse::Markup(body.to_string()));
        }
        if trimmed.is_empty() {
            return Ok(RawResponse::Json(Value::Null));
        }
        serde_json::from_str(trimmed)
            .map(RawResponse::Json)
            .map_err(|e| NormalizeError::InvalidJson(e.to_string()))
    }
}

/// Outcome of normalizing a list: the records that survived and why the
/// others did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    pub dropped: Vec<Diagnostic>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

/// One skipped list element. `position` is its 0-based index in the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    NotAnObject,
    MissingUrl,
    /// Markup item card without an image source.
    MissingSource,
    DuplicateId(String),
    EmptyTagName,
    DuplicateTag(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}: ", self.position)?;
        match &self.reason {
            DropReason::NotAnObject => f.write_str("not an object"),
            DropReason::MissingUrl => f.write_str("no url"),
            DropReason::MissingSource => f.write_str("item card has no image source"),
            DropReason::DuplicateId(id) => write!(f, "duplicate id '{id}'"),
            DropReason::EmptyTagName => f.write_str("tag has no name"),
            DropReason::DuplicateTag(name) => write!(f, "duplicate tag '{name}'"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    base: Option<Url>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative image sources found in markup are resolved against `base`.
    pub fn with_base(base: Url) -> Self {
        Self { base: Some(base) }
    }

    pub fn normalize_list(&self, raw: &RawResponse) -> Normalized<ImageRecord> {
        match raw {
            RawResponse::Json(Value::Array(items)) => json::image_list(items),
            RawResponse::Json(_) => Normalized::default(),
            RawResponse::Markup(body) => markup::gallery(body, self.base.as_ref()),
        }
    }

    pub fn normalize_one(&self, raw: &RawResponse) -> Result<ImageRecord, NormalizeError> {
        match raw {
            RawResponse::Json(value) => json::image(value),
            RawResponse::Markup(body) => markup::view_page(body, self.base.as_ref()),
        }
    }

    pub fn normalize_tags(&self, raw: &RawResponse) -> Normalized<TagRecord> {
        match raw {
            RawResponse::Json(Value::Array(items)) => json::tag_list(items),
            _ => Normalized::default(),
        }
    }

    /// Record for an image known only by its location, as returned by the
    /// markup backend's upload acknowledgement.
    pub fn record_from_url(&self, url: &str) -> ImageRecord {
        let url = resolve(self.base.as_ref(), url.trim());
        let name = name_from_url(&url);
        ImageRecord::new(name.clone(), name, url)
    }
}

/// Accumulates image records while enforcing id uniqueness.
struct ImageCollector {
    seen: HashSet<String>,
    out: Normalized<ImageRecord>,
}

impl ImageCollector {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            out: Normalized::default(),
        }
    }

    fn accept(&mut self, position: usize, record: ImageRecord) {
        if self.seen.insert(record.id.clone()) {
            self.out.items.push(record);
        } else {
            self.skip(position, DropReason::DuplicateId(record.id));
        }
    }

    fn skip(&mut self, position: usize, reason: DropReason) {
        self.out.dropped.push(Diagnostic { position, reason });
    }

    fn finish(self) -> Normalized<ImageRecord> {
        self.out
    }
}

/// Last non-empty path segment of `url`, ignoring query and fragment.
pub(crate) fn name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
        .to_string()
}

fn resolve(base: Option<&Url>, src: &str) -> String {
    match base.and_then(|base| base.join(src).ok()) {
        Some(url) => url.to_string(),
        None => src.to_string(),
    }
}
