use super::image_card::snapshot_view;
use crate::app::Page;
use crate::context::CatalogContext;
use common::client::Listing;
use common::model::image::ImageRecord;
use common::model::snapshot::CatalogSnapshot;
use common::refresh::{LoadTicket, ViewBinding, ViewScope};
use yew::context::ContextHandle;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TaggedImagesProps {
    pub tag: String,
}

pub enum Msg {
    ContextChanged(CatalogContext),
    Loaded(LoadTicket, Listing<ImageRecord>),
}

/// Images carrying one tag. Changing the `tag` prop rebinds the view, so a
/// late answer for the previous tag is dropped.
pub struct TaggedImages {
    catalog: CatalogContext,
    _handle: ContextHandle<CatalogContext>,
    binding: ViewBinding<CatalogSnapshot>,
}

impl TaggedImages {
    fn reload(&mut self, ctx: &Context<Self>) {
        let Some(ticket) = self.binding.observe(&self.catalog.refresh) else {
            return;
        };
        let client = self.catalog.client.clone();
        let link = ctx.link().clone();
        let tag = ctx.props().tag.clone();
        spawn_local(async move {
            let listing = client.list_images_by_tag(&tag).await;
            link.send_message(Msg::Loaded(ticket, listing));
        });
    }
}

impl Component for TaggedImages {
    type Message = Msg;
    type Properties = TaggedImagesProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (catalog, handle) = ctx
            .link()
            .context::<CatalogContext>(ctx.link().callback(Msg::ContextChanged))
            .expect("TaggedImages must be rendered inside a CatalogContext provider");
        let mut view = Self {
            catalog,
            _handle: handle,
            binding: ViewBinding::new(ViewScope::Tagged(ctx.props().tag.clone())),
        };
        view.reload(ctx);
        view
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.binding
            .rebind(ViewScope::Tagged(ctx.props().tag.clone()));
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
            Msg::Loaded(ticket, listing) => self.binding.resolve_listing(&ticket, listing),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let tag = match self.binding.scope() {
            ViewScope::Tagged(tag) => tag.clone(),
            _ => String::new(),
        };
        let back = self.catalog.navigate.reform(|_: MouseEvent| Page::Tags);

        html! {
            <section class="tagged-images">
                <h2>{ format!("Tagged \"{tag}\"") }</h2>
                <button onclick={back}>{"All tags"}</button>
                { snapshot_view(&self.binding, &self.catalog.navigate, "No images carry this tag.") }
            </section>
        }
    }
}
