use crate::app::Page;
use crate::context::CatalogContext;
use crate::helpers::show_toast;
use common::config::Dialect;
use common::error::CatalogError;
use common::model::image::ImageRecord;
use common::refresh::Mutation;
use common::requests::UploadFile;
use gloo_file::{futures::read_as_bytes, Blob};
use log::warn;
use web_sys::{File, HtmlInputElement};
use yew::context::ContextHandle;
use yew::platform::spawn_local;
use yew::prelude::*;

pub enum Msg {
    ContextChanged(CatalogContext),
    FileSelected(Option<File>),
    TagsInput(String),
    Submit,
    Uploaded(Result<ImageRecord, CatalogError>),
}

pub struct UploadPage {
    catalog: CatalogContext,
    _handle: ContextHandle<CatalogContext>,
    file: Option<File>,
    tags: String,
    uploading: bool,
    error: Option<String>,
}

impl Component for UploadPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (catalog, handle) = ctx
            .link()
            .context::<CatalogContext>(ctx.link().callback(Msg::ContextChanged))
            .expect("UploadPage must be rendered inside a CatalogContext provider");
        Self {
            catalog,
            _handle: handle,
            file: None,
            tags: String::new(),
            uploading: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ContextChanged(catalog) => {
                self.catalog = catalog;
                false
            }
            Msg::FileSelected(file) => {
                self.file = file;
                self.error = None;
                true
            }
            Msg::TagsInput(tags) => {
                self.tags = tags;
                false
            }
            Msg::Submit => {
                if self.uploading {
                    return false;
                }
                let Some(file) = self.file.clone() else {
                    self.error = Some("Choose an image to upload.".to_string());
                    return true;
                };
                self.uploading = true;
                self.error = None;

                let client = self.catalog.client.clone();
                let link = ctx.link().clone();
                let tags = self.tags.clone();
                spawn_local(async move {
                    let name = file.name();
                    let content_type = file.type_();
                    let result = match read_as_bytes(&Blob::from(file)).await {
                        Ok(bytes) => {
                            let mut upload = UploadFile::new(name, bytes);
                            if !content_type.is_empty() {
                                upload = upload.with_content_type(content_type);
                            }
                            client.upload_image(upload, Some(&tags)).await
                        }
                        Err(err) => Err(CatalogError::validation(format!(
                            "Could not read {name}: {err}"
                        ))),
                    };
                    link.send_message(Msg::Uploaded(result));
                });
                true
            }
            Msg::Uploaded(result) => {
                self.uploading = false;
                match result {
                    Ok(image) => {
                        show_toast(&format!("Uploaded {}.", image.name));
                        self.file = None;
                        self.tags.clear();
                        self.catalog.on_mutation.emit(Mutation::Uploaded {
                            image_id: image.id,
                        });
                        self.catalog.navigate.emit(Page::Gallery);
                    }
                    Err(err) => {
                        warn!("upload failed: {err}");
                        self.error = Some(err.user_message());
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let onchange = link.callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::FileSelected(input.files().and_then(|files| files.get(0)))
        });
        let oninput = link.callback(|e: InputEvent| {
            Msg::TagsInput(e.target_unchecked_into::<HtmlInputElement>().value())
        });
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        let takes_tags = self.catalog.client.dialect() == Dialect::Structured;

        html! {
            <section class="upload">
                <h2>{"Upload an image"}</h2>
                <form {onsubmit}>
                    <input type="file" accept="image/*" {onchange} disabled={self.uploading} />
                    if takes_tags {
                        <input
                            type="text"
                            placeholder="Tags, separated by commas"
                            value={self.tags.clone()}
                            {oninput}
                            disabled={self.uploading}
                        />
                    }
                    <button type="submit" disabled={self.uploading}>
                        { if self.uploading { "Uploading..." } else { "Upload" } }
                    </button>
                </form>
                if let Some(error) = &self.error {
                    <p class="status error">{ error.clone() }</p>
                }
            </section>
        }
    }
}
