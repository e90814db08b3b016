use crate::components::gallery::Gallery;
use crate::components::image_details::ImageDetails;
use crate::components::tagged_images::TaggedImages;
use crate::components::tags_list::TagsList;
use crate::components::upload_page::UploadPage;
use crate::context::CatalogContext;
use crate::transport::GlooTransport;
use common::client::CatalogClient;
use common::config::CatalogConfig;
use common::refresh::{Mutation, RefreshCoordinator};
use log::{info, warn};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Gallery,
    Upload,
    Tags,
    Tagged(String),
    Detail(String),
}

pub enum Msg {
    Mutated(Mutation),
    Navigate(Page),
}

/// Root component. Owns the refresh coordinator and the current page.
pub struct App {
    catalog: CatalogContext,
    page: Page,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = load_config();
        info!("using the {} backend at {}", config.dialect, config.base_url);
        let client = CatalogClient::new(GlooTransport::new(&config), &config);

        Self {
            catalog: CatalogContext {
                client: Rc::new(client),
                refresh: RefreshCoordinator::new(),
                on_mutation: ctx.link().callback(Msg::Mutated),
                navigate: ctx.link().callback(Msg::Navigate),
            },
            page: Page::Gallery,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Mutated(mutation) => {
                self.catalog.refresh.record(&mutation);
                true
            }
            Msg::Navigate(page) => {
                if self.page == page {
                    return false;
                }
                self.page = page;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let page = match &self.page {
            Page::Gallery => html! { <Gallery /> },
            Page::Upload => html! { <UploadPage /> },
            Page::Tags => html! { <TagsList /> },
            Page::Tagged(tag) => html! { <TaggedImages tag={tag.clone()} /> },
            Page::Detail(id) => html! { <ImageDetails id={id.clone()} /> },
        };

        html! {
            <ContextProvider<CatalogContext> context={self.catalog.clone()}>
                <nav class="gallery-nav">
                    <button onclick={link.callback(|_| Msg::Navigate(Page::Gallery))}>{"Gallery"}</button>
                    <button onclick={link.callback(|_| Msg::Navigate(Page::Upload))}>{"Upload"}</button>
                    <button onclick={link.callback(|_| Msg::Navigate(Page::Tags))}>{"Tags"}</button>
                </nav>
                <main>{ page }</main>
            </ContextProvider<CatalogContext>>
        }
    }
}

fn load_config() -> CatalogConfig {
    match CatalogConfig::from_values(option_env!("GALLERY_DIALECT"), option_env!("GALLERY_API_URL")) {
        Ok(config) => config,
        Err(err) => {
            warn!("ignoring build-time gallery settings: {err}");
            CatalogConfig::default()
        }
    }
}
