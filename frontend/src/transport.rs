//! `Transport` over the browser's fetch API.

use async_trait::async_trait;
use common::client::{ApiReply, ApiRequest, Method, RequestBody, Transport};
use common::config::CatalogConfig;
use common::error::TransportError;
use common::requests::UploadForm;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

pub struct GlooTransport {
    config: CatalogConfig,
}

impl GlooTransport {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply, TransportError> {
        let url = self.config.endpoint(&request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Delete => Request::delete(&url),
        };
        let request = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.body(form_data(&form)?),
        }
        .map_err(|e| TransportError::Connection(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let status = response.status();
        let content_type = response.headers().get("content-type");
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(ApiReply {
            status,
            content_type,
            body,
        })
    }
}

/// Builds the multipart body: the file under `image`, tags under `tags`.
fn form_data(form: &UploadForm) -> Result<FormData, TransportError> {
    let data = FormData::new().map_err(js_error)?;

    let bytes = js_sys::Uint8Array::from(form.file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    if let Some(content_type) = &form.file.content_type {
        options.set_type(content_type);
    }
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;

    data.append_with_blob_and_filename("image", &blob, &form.file.name)
        .map_err(js_error)?;
    if let Some(tags) = &form.tags {
        data.append_with_str("tags", tags).map_err(js_error)?;
    }
    Ok(data)
}

fn js_error(value: JsValue) -> TransportError {
    TransportError::Connection(format!("{value:?}"))
}
