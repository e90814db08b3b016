//! One image with its metadata, plus tag editing and deletion.
//!
//! Reads that fail stay on screen with a retry button. Mutations report their
//! error inline and leave the form as it was so the user can try again.

use crate::app::Page;
use crate::context::CatalogContext;
use crate::helpers::show_toast;
use common::client::DeleteOutcome;
use common::config::Dialect;
use common::error::CatalogError;
use common::model::image::ImageRecord;
use common::refresh::{LoadTicket, Mutation, ViewBinding, ViewScope, ViewState};
use common::requests::split_tags;
use log::warn;
use web_sys::HtmlInputElement;
use yew::context::ContextHandle;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ImageDetailsProps {
    pub id: String,
}

pub enum Msg {
    ContextChanged(CatalogContext),
    Loaded(LoadTicket, Result<ImageRecord, CatalogError>),
    Retry,
    TagInput(String),
    SubmitTags,
    TagsSaved(Result<(), CatalogError>),
    AskDelete,
    CancelDelete,
    ConfirmDelete,
    Deleted(Result<DeleteOutcome, CatalogError>),
}

pub struct ImageDetails {
    catalog: CatalogContext,
    _handle: ContextHandle<CatalogContext>,
    binding: ViewBinding<ImageRecord>,
    tag_input: String,
    /// A mutation is in flight; its controls are disabled.
    busy: bool,
    confirming_delete: bool,
    error: Option<String>,
}

impl ImageDetails {
    fn load(&self, ctx: &Context<Self>, ticket: LoadTicket) {
        let client = self.catalog.client.clone();
        let link = ctx.link().clone();
        let id = ctx.props().id.clone();
        spawn_local(async move {
            let result = client.get_image(&id).await;
            link.send_message(Msg::Loaded(ticket, result));
        });
    }

    fn reload(&mut self, ctx: &Context<Self>) {
        if let Some(ticket) = self.binding.observe(&self.catalog.refresh) {
            self.load(ctx, ticket);
        }
    }

    fn editable(&self) -> bool {
        self.catalog.client.dialect() == Dialect::Structured
    }

    fn editor(&self, ctx: &Context<Self>) -> Html {
        if !self.editable() {
            return html! {};
        }
        let link = ctx.link();
        let oninput = link.callback(|e: InputEvent| {
            Msg::TagInput(e.target_unchecked_into::<HtmlInputElement>().value())
        });
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::SubmitTags
        });

        html! {
            <div class="image-editor">
                <form {onsubmit}>
                    <input
                        type="text"
                        placeholder="Add tags, separated by commas"
                        value={self.tag_input.clone()}
                        {oninput}
                        disabled={self.busy}
                    />
                    <button type="submit" disabled={self.busy}>{"Add tags"}</button>
                </form>
                if self.confirming_delete {
                    <div class="confirm-delete">
                        <span>{"Delete this image permanently?"}</span>
                        <button onclick={link.callback(|_| Msg::ConfirmDelete)} disabled={self.busy}>{"Delete"}</button>
                        <button onclick={link.callback(|_| Msg::CancelDelete)} disabled={self.busy}>{"Cancel"}</button>
                    </div>
                } else {
                    <button class="danger" onclick={link.callback(|_| Msg::AskDelete)} disabled={self.busy}>{"Delete image"}</button>
                }
                if let Some(error) = &self.error {
                    <p class="status error">{ error.clone() }</p>
                }
            </div>
        }
    }
}

impl Component for ImageDetails {
    type Message = Msg;
    type Properties = ImageDetailsProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (catalog, handle) = ctx
            .link()
            .context::<CatalogContext>(ctx.link().callback(Msg::ContextChanged))
            .expect("ImageDetails must be rendered inside a CatalogContext provider");
        let mut details = Self {
            catalog,
            _handle: handle,
            binding: ViewBinding::new(ViewScope::Detail(ctx.props().id.clone())),
            tag_input: String::new(),
            busy: false,
            confirming_delete: false,
            error: None,
        };
        details.reload(ctx);
        details
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.binding.rebind(ViewScope::Detail(ctx.props().id.clone()));
        self.tag_input.clear();
        self.confirming_delete = false;
        self.error = None;
        self.reload(ctx);
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ContextChanged(catalog) => {
                self.catalog = catalog;
                self.reload(ctx);
                true
            }
            Msg::Loaded(ticket, result) => self
                .binding
                .resolve(&ticket, result.map_err(|err| err.user_message())),
            Msg::Retry => match self.binding.retry() {
                Some(ticket) => {
                    self.load(ctx, ticket);
                    true
                }
                None => false,
            },
            Msg::TagInput(value) => {
                self.tag_input = value;
                false
            }
            Msg::SubmitTags => {
                let tags = split_tags(&self.tag_input);
                if tags.is_empty() {
                    self.error = Some("Enter at least one tag.".to_string());
                    return true;
                }
                self.busy = true;
                self.error = None;
                let client = self.catalog.client.clone();
                let link = ctx.link().clone();
                let id = ctx.props().id.clone();
                spawn_local(async move {
                    let result = client.add_tags(&id, tags).await;
                    link.send_message(Msg::TagsSaved(result));
                });
                true
            }
            Msg::TagsSaved(result) => {
                self.busy = false;
                match result {
                    Ok(()) => {
                        self.tag_input.clear();
                        show_toast("Tags added.");
                        self.catalog.on_mutation.emit(Mutation::TagsAdded {
                            image_id: ctx.props().id.clone(),
                        });
                    }
                    Err(err) => {
                        warn!("adding tags to {} failed: {err}", ctx.props().id);
                        self.error = Some(err.user_message());
                    }
                }
                true
            }
            Msg::AskDelete => {
                self.confirming_delete = true;
                true
            }
            Msg::CancelDelete => {
                self.confirming_delete = false;
                true
            }
            Msg::ConfirmDelete => {
                self.busy = true;
                self.error = None;
                let client = self.catalog.client.clone();
                let link = ctx.link().clone();
                let id = ctx.props().id.clone();
                spawn_local(async move {
                    let result = client.ensure_deleted(&id).await;
                    link.send_message(Msg::Deleted(result));
                });
                true
            }
            Msg::Deleted(result) => {
                self.busy = false;
                self.confirming_delete = false;
                match result {
                    Ok(outcome) => {
                        show_toast(match outcome {
                            DeleteOutcome::Removed => "Image deleted.",
                            DeleteOutcome::AlreadyAbsent => "Image was already deleted.",
                        });
                        // Leave the page first so this view does not re-read a
                        // deleted image.
                        self.catalog.navigate.emit(Page::Gallery);
                        self.catalog.on_mutation.emit(Mutation::Deleted {
                            image_id: ctx.props().id.clone(),
                        });
                    }
                    Err(err) => {
                        warn!("deleting {} failed: {err}", ctx.props().id);
                        self.error = Some(err.user_message());
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = match self.binding.state() {
            ViewState::Idle | ViewState::Loading(_) => html! { <p class="status">{"Loading image..."}</p> },
            ViewState::Failed(reason) => html! {
                <div class="status error">
                    <p>{ reason.clone() }</p>
                    <button onclick={ctx.link().callback(|_| Msg::Retry)}>{"Retry"}</button>
                </div>
            },
            ViewState::Ready(image) => html! {
                <>
                    <img class="main-image" src={image.url.clone()} alt={image.name.clone()} />
                    <dl class="image-meta">
                        <dt>{"Name"}</dt><dd>{ image.name.clone() }</dd>
                        if let Some(content_type) = &image.content_type {
                            <><dt>{"Type"}</dt><dd>{ content_type.clone() }</dd></>
                        }
                        if let Some(size) = &image.size {
                            <><dt>{"Size"}</dt><dd>{ size.to_string() }</dd></>
                        }
                        if let Some(uploaded_at) = &image.uploaded_at {
                            <><dt>{"Uploaded"}</dt><dd>{ uploaded_at.to_string() }</dd></>
                        }
                    </dl>
                    <div class="image-tags">
                        { for image.tags.iter().map(|tag| {
                            let name = tag.clone();
                            let onclick = self.catalog.navigate.reform(move |_: MouseEvent| Page::Tagged(name.clone()));
                            html! { <button class="tag" {onclick}>{ tag.clone() }</button> }
                        }) }
                    </div>
                    { self.editor(ctx) }
                </>
            },
        };

        html! {
            <section class="image-details">
                <button onclick={self.catalog.navigate.reform(|_: MouseEvent| Page::Gallery)}>{"Back to gallery"}</button>
                { body }
            </section>
        }
    }
}
