use super::{Diagnostic, DropReason, ImageCollector, Normalized, name_from_url};
use crate::error::NormalizeError;
use crate::model::image::{ImageRecord, ImageSize, UploadedAt};
use crate::model::tag::TagRecord;
use crate::requests::canonical_tags;
use serde_json::{Map, Value};

const URL_KEYS: &[&str] = &["url", "src", "imageUrl"];
const NAME_KEYS: &[&str] = &["name", "filename", "file"];
const CONTENT_TYPE_KEYS: &[&str] = &["contentType", "content_type"];
const UPLOADED_AT_KEYS: &[&str] = &["uploadedAt", "uploaded_at", "date"];

pub(super) fn image_list(items: &[Value]) -> Normalized<ImageRecord> {
    let mut collector = ImageCollector::new();
    for (position, item) in items.iter().enumerate() {
        match image(item) {
            Ok(record) => collector.accept(position, record),
            Err(NormalizeError::MissingUrl) => collector.skip(position, DropReason::MissingUrl),
            Err(_) => collector.skip(position, DropReason::NotAnObject),
        }
    }
    collector.finish()
}

pub(super) fn image(value: &Value) -> Result<ImageRecord, NormalizeError> {
    let object = value.as_object().ok_or(NormalizeError::NotAnObject)?;

    let url = text(object, URL_KEYS).ok_or(NormalizeError::MissingUrl)?;
    let name = text(object, NAME_KEYS).unwrap_or_else(|| name_from_url(&url));
    let id = object
        .get("id")
        .and_then(scalar_text)
        .unwrap_or_else(|| name.clone());

    let mut record = ImageRecord::new(id, name, url);
    record.content_type = text(object, CONTENT_TYPE_KEYS);
    record.size = object.get("size").and_then(size);
    record.uploaded_at = text(object, UPLOADED_AT_KEYS).map(|raw| UploadedAt::from_wire(&raw));
    record.tags = match object.get("tags") {
        Some(Value::Array(tags)) => canonical_tags(tags.iter().filter_map(tag_name)),
        _ => Vec::new(),
    };
    Ok(record)
}

pub(super) fn tag_list(items: &[Value]) -> Normalized<TagRecord> {
    let mut out = Normalized::default();
    for (position, item) in items.iter().enumerate() {
        let (name, id) = match item {
            Value::String(name) => (Some(name.trim()), None),
            Value::Object(object) => (
                object.get("name").and_then(Value::as_str).map(str::trim),
                object.get("id").and_then(scalar_text),
            ),
            _ => {
                out.dropped.push(Diagnostic {
                    position,
                    reason: DropReason::NotAnObject,
                });
                continue;
            }
        };

        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => {
                out.dropped.push(Diagnostic {
                    position,
                    reason: DropReason::EmptyTagName,
                });
                continue;
            }
        };
        if out.items.iter().any(|tag: &TagRecord| tag.name == name) {
            out.dropped.push(Diagnostic {
                position,
                reason: DropReason::DuplicateTag(name.to_string()),
            });
            continue;
        }
        out.items.push(TagRecord {
            name: name.to_string(),
            id,
        });
    }
    out
}

/// First of `keys` holding a non-blank string, trimmed.
fn text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn size(value: &Value) -> Option<ImageSize> {
    match value {
        Value::Number(n) => Some(match n.as_u64() {
            Some(bytes) => ImageSize::Bytes(bytes),
            None => ImageSize::Label(n.to_string()),
        }),
        Value::String(label) if !label.trim().is_empty() => {
            Some(ImageSize::Label(label.trim().to_string()))
        }
        _ => None,
    }
}

fn tag_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(name) => Some(name),
        Value::Object(object) => object.get("name").and_then(Value::as_str),
        _ => None,
    }
}
