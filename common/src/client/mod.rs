//! Catalog Client: the typed operation set UI code talks to.
//!
//! Every operation works against either backend dialect. Two policies apply:
//! - Read-many operations (`list_images`, `list_images_by_tag`, `list_tags`)
//!   never fail. Transport, status and parse failures are logged and recorded
//!   on the returned `Listing`, whose items are then empty.
//! - Read-one and mutating operations return `Result` so detail and editing
//!   views can show the failure and offer a retry.
//!
//! Client-side preconditions (blank ids, empty files, no tags) are checked
//! before any request is sent and reported as `CatalogError::Validation`.

use crate::config::{CatalogConfig, Dialect};
use crate::error::{CatalogError, NormalizeError, TransportError};
use crate::model::image::ImageRecord;
use crate::model::tag::TagRecord;
use crate::normalize::{Diagnostic, Normalized, Normalizer, RawResponse};
use crate::requests::{AddTagsRequest, UploadAck, UploadFile, UploadForm, canonical_tags, split_tags};
use crate::tag_index::build_index;
use log::{debug, info, warn};
use serde_json::Value;
use std::ops::Deref;

mod routes;
mod transport;


pub use transport::{ApiReply, ApiRequest, Method, RequestBody, Transport};

/// Result of a read-many operation.
///
/// `failure` holds the reason the read degraded, if it did. Callers that want
/// to tell "the catalog is empty" apart from "the catalog could not be read"
/// inspect it; everyone else just renders `items`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Elements of the payload the normalizer skipped.
    pub dropped: Vec<Diagnostic>,
    pub failure: Option<CatalogError>,
}

impl<T> Listing<T> {
    pub fn failed(failure: CatalogError) -> Self {
        Self {
            items: Vec::new(),
            dropped: Vec::new(),
            failure: Some(failure),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    /// True when the backend could not be reached or answered with a server
    /// error, as opposed to answering with nothing usable.
    pub fn is_unavailable(&self) -> bool {
        self.failure.as_ref().is_some_and(CatalogError::is_transport)
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Listing<U> {
        Listing {
            items: f(self.items),
            dropped: self.dropped,
            failure: self.failure,
        }
    }
}

impl<T> From<Normalized<T>> for Listing<T> {
    fn from(normalized: Normalized<T>) -> Self {
        Self {
            items: normalized.items,
            dropped: normalized.dropped,
            failure: None,
        }
    }
}

impl<T> Deref for Listing<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

/// How a delete ended when "already gone" counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    AlreadyAbsent,
}

pub struct CatalogClient<T> {
    transport: T,
    dialect: Dialect,
    normalizer: Normalizer,
}

impl<T: Transport> CatalogClient<T> {
    pub fn new(transport: T, config: &CatalogConfig) -> Self {
        let normalizer = match config.parsed_base_url() {
            Ok(base) => Normalizer::with_base(base),
            Err(err) => {
                warn!("relative image sources will not be resolved: {err}");
                Normalizer::new()
            }
        };
        Self {
            transport,
            dialect: config.dialect,
            normalizer,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_images(&self) -> Listing<ImageRecord> {
        let path = match self.dialect {
            Dialect::Structured => routes::structured::IMAGES,
            Dialect::Markup => routes::markup::GALLERY,
        };
        self.read_many("list images", ApiRequest::get(path), "image list", |n, raw| {
            n.normalize_list(raw)
        })
        .await
    }

    /// Images carrying `tag`. The tag is trimmed, then matched exactly,
    /// case included.
    pub async fn list_images_by_tag(&self, tag: &str) -> Listing<ImageRecord> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Listing::failed(CatalogError::validation("Enter a tag to filter by."));
        }

        match self.dialect {
            Dialect::Structured => {
                let request = ApiRequest::get(routes::structured::images_by_tag(tag));
                self.read_many("list images by tag", request, &format!("tag '{tag}'"), |n, raw| {
                    n.normalize_list(raw)
                })
                .await
            }
            Dialect::Markup => self.list_images().await.map_items(|images| {
                let index = build_index(&images);
                let ids = index.images_for(tag);
                images
                    .into_iter()
                    .filter(|image| ids.contains(&image.id))
                    .collect()
            }),
        }
    }

    pub async fn list_tags(&self) -> Listing<TagRecord> {
        match self.dialect {
            Dialect::Structured => {
                let request = ApiRequest::get(routes::structured::TAGS);
                self.read_many("list tags", request, "tag list", |n, raw| n.normalize_tags(raw))
                    .await
            }
            Dialect::Markup => self
                .list_images()
                .await
                .map_items(|images| build_index(&images).tag_records()),
        }
    }

    pub async fn get_image(&self, id: &str) -> Result<ImageRecord, CatalogError> {
        let id = require_id(id)?;
        let path = match self.dialect {
            Dialect::Structured => routes::structured::image(id),
            Dialect::Markup => routes::markup::view(id),
        };

        let raw = self
            .fetch(ApiRequest::get(path), &format!("image '{id}'"))
            .await?;
        let mut record = self.normalizer.normalize_one(&raw)?;
        if self.dialect == Dialect::Markup {
            record.id = id.to_string();
            record.name = id.to_string();
        }
        Ok(record)
    }

    /// Uploads one image with an optional comma-separated tag list.
    ///
    /// Tags are canonicalized here (see `requests::split_tags`) so the server
    /// only ever receives cleaned names. The markup backend has no tag
    /// support and the tags are not sent to it.
    pub async fn upload_image(
        &self,
        file: UploadFile,
        tags_csv: Option<&str>,
    ) -> Result<ImageRecord, CatalogError> {
        if file.name.trim().is_empty() {
            return Err(CatalogError::validation("Choose an image to upload."));
        }
        if file.bytes.is_empty() {
            return Err(CatalogError::validation("The selected file is empty."));
        }
        let tags = tags_csv.map(split_tags).unwrap_or_default();

        match self.dialect {
            Dialect::Structured => self.upload_structured(file, tags).await,
            Dialect::Markup => {
                if !tags.is_empty() {
                    debug!("markup backend does not store tags, dropping {tags:?}");
                }
                self.upload_markup(file).await
            }
        }
    }

    async fn upload_structured(
        &self,
        file: UploadFile,
        tags: Vec<String>,
    ) -> Result<ImageRecord, CatalogError> {
        let name = file.name.clone();
        let form = UploadForm {
            file,
            tags: (!tags.is_empty()).then(|| tags.join(",")),
        };
        let request = ApiRequest::post(routes::structured::IMAGES, RequestBody::Multipart(form));
        let raw = self.fetch(request, "upload endpoint").await?;

        let record = match self.normalizer.normalize_one(&raw) {
            Ok(record) => record,
            // Some servers acknowledge with `{id, status, file}` instead of the
            // stored record; read it back so callers always get a full record.
            Err(NormalizeError::MissingUrl) => match acknowledged_id(&raw) {
                Some(id) => {
                    debug!("upload of {name} acknowledged as {id}, reading it back");
                    self.get_image(&id).await?
                }
                None => return Err(NormalizeError::MissingUrl.into()),
            },
            Err(err) => return Err(err.into()),
        };

        info!("uploaded {name} as image {}", record.id);
        Ok(record)
    }

    async fn upload_markup(&self, file: UploadFile) -> Result<ImageRecord, CatalogError> {
        let name = file.name.clone();
        let form = UploadForm { file, tags: None };
        let request = ApiRequest::post(routes::markup::UPLOAD, RequestBody::Multipart(form));
        let reply = self.exchange(request, "upload endpoint").await?;

        let ack: UploadAck = serde_json::from_str(&reply.body)
            .map_err(|e| NormalizeError::InvalidJson(e.to_string()))?;
        if let Some(error) = ack.error {
            return Err(CatalogError::Rejected(error));
        }
        if !ack.success {
            return Err(CatalogError::Rejected(
                "the server did not confirm the upload".to_string(),
            ));
        }
        let url = ack
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                CatalogError::Rejected(
                    "image was uploaded but its URL could not be determined".to_string(),
                )
            })?;

        let record = self.normalizer.record_from_url(&url);
        info!("uploaded {name} to {}", record.url);
        Ok(record)
    }

    /// Attaches tags to an image.
    ///
    /// Nothing is merged locally: the server decides the resulting tag set,
    /// so callers reload the image afterwards.
    pub async fn add_tags<I, S>(&self, image_id: &str, tags: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.require_structured("adding tags")?;
        let id = require_id(image_id)?;
        let tags = canonical_tags(tags);
        if tags.is_empty() {
            return Err(CatalogError::validation("Enter at least one tag."));
        }

        let count = tags.len();
        let body = serde_json::to_value(AddTagsRequest { tags })
            .map_err(|e| CatalogError::validation(e.to_string()))?;
        let request = ApiRequest::post(routes::structured::image_tags(id), RequestBody::Json(body));
        self.exchange(request, &format!("image '{id}'")).await?;

        info!("added {count} tag(s) to image {id}");
        Ok(())
    }

    /// Deletes an image. Deleting twice is not idempotent: the second call
    /// reports `NotFound`. See `ensure_deleted` for callers that only care
    /// that the image is gone.
    pub async fn delete_image(&self, id: &str) -> Result<(), CatalogError> {
        self.require_structured("deleting images")?;
        let id = require_id(id)?;

        let request = ApiRequest::delete(routes::structured::image(id));
        self.exchange(request, &format!("image '{id}'")).await?;

        info!("deleted image {id}");
        Ok(())
    }

    pub async fn ensure_deleted(&self, id: &str) -> Result<DeleteOutcome, CatalogError> {
        match self.delete_image(id).await {
            Ok(()) => Ok(DeleteOutcome::Removed),
            Err(err) if err.is_not_found() => {
                debug!("image {id} was already gone");
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(err) => Err(err),
        }
    }

    async fn read_many<R>(
        &self,
        operation: &str,
        request: ApiRequest,
        subject: &str,
        normalize: impl FnOnce(&Normalizer, &RawResponse) -> Normalized<R>,
    ) -> Listing<R> {
        match self.fetch(request, subject).await {
            Ok(raw) => {
                let normalized = normalize(&self.normalizer, &raw);
                for diagnostic in &normalized.dropped {
                    debug!("{operation}: skipped {diagnostic}");
                }
                Listing::from(normalized)
            }
            Err(err) => {
                warn!("{operation} degraded to an empty result: {err}");
                Listing::failed(err)
            }
        }
    }

    async fn fetch(&self, request: ApiRequest, subject: &str) -> Result<RawResponse, CatalogError> {
        let reply = self.exchange(request, subject).await?;
        Ok(RawResponse::from_reply(&reply)?)
    }

    /// Sends `request` and classifies the status. `subject` names what a 404
    /// refers to.
    async fn exchange(&self, request: ApiRequest, subject: &str) -> Result<ApiReply, CatalogError> {
        debug!("{} {}", request.method.as_str(), request.path);
        let reply = self.transport.send(request).await?;

        match reply.status {
            200..=299 => Ok(reply),
            404 => Err(CatalogError::not_found(subject)),
            400..=499 => Err(CatalogError::Rejected(
                error_message(&reply.body).unwrap_or_else(|| format!("status {}", reply.status)),
            )),
            status => Err(TransportError::Status { status }.into()),
        }
    }

    fn require_structured(&self, operation: &'static str) -> Result<(), CatalogError> {
        match self.dialect {
            Dialect::Structured => Ok(()),
            dialect => Err(CatalogError::Unsupported { operation, dialect }),
        }
    }
}

fn require_id(id: &str) -> Result<&str, CatalogError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CatalogError::validation("An image id is required."));
    }
    Ok(id)
}

fn acknowledged_id(raw: &RawResponse) -> Option<String> {
    match raw {
        RawResponse::Json(Value::Object(object)) => match object.get("id")? {
            Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// The `error` field of a JSON error body, if there is one.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}
