use super::image_card::snapshot_view;
use crate::context::CatalogContext;
use common::client::Listing;
use common::model::image::ImageRecord;
use common::model::snapshot::CatalogSnapshot;
use common::refresh::{LoadTicket, ViewBinding, ViewScope};
use yew::context::ContextHandle;
use yew::platform::spawn_local;
use yew::prelude::*;

pub enum Msg {
    ContextChanged(CatalogContext),
    Loaded(LoadTicket, Listing<ImageRecord>),
}

/// Every image in the catalog.
pub struct Gallery {
    catalog: CatalogContext,
    _handle: ContextHandle<CatalogContext>,
    binding: ViewBinding<CatalogSnapshot>,
}

impl Gallery {
    fn reload(&mut self, ctx: &Context<Self>) {
        let Some(ticket) = self.binding.observe(&self.catalog.refresh) else {
            return;
        };
        let client = self.catalog.client.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let listing = client.list_images().await;
            link.send_message(Msg::Loaded(ticket, listing));
        });
    }
}

impl Component for Gallery {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (catalog, handle) = ctx
            .link()
            .context::<CatalogContext>(ctx.link().callback(Msg::ContextChanged))
            .expect("Gallery must be rendered inside a CatalogContext provider");
        let mut gallery = Self {
            catalog,
            _handle: handle,
            binding: ViewBinding::new(ViewScope::Gallery),
        };
        gallery.reload(ctx);
        gallery
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
        html! {
            <section class="gallery">
                <h2>{"Gallery"}</h2>
                { snapshot_view(&self.binding, &self.catalog.navigate, "No images uploaded yet.") }
            </section>
        }
    }
}
