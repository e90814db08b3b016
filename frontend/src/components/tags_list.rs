use crate::app::Page;
use crate::context::CatalogContext;
use common::client::Listing;
use common::model::tag::TagRecord;
use common::refresh::{LoadTicket, ViewBinding, ViewScope, ViewState};
use yew::context::ContextHandle;
use yew::platform::spawn_local;
use yew::prelude::*;

pub enum Msg {
    ContextChanged(CatalogContext),
    Loaded(LoadTicket, Listing<TagRecord>),
}

pub struct TagsList {
    catalog: CatalogContext,
    _handle: ContextHandle<CatalogContext>,
    binding: ViewBinding<Vec<TagRecord>>,
}

impl TagsList {
    fn reload(&mut self, ctx: &Context<Self>) {
        let Some(ticket) = self.binding.observe(&self.catalog.refresh) else {
            return;
        };
        let client = self.catalog.client.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let listing = client.list_tags().await;
            link.send_message(Msg::Loaded(ticket, listing));
        });
    }

    fn tag_button(&self, tag: &TagRecord) -> Html {
        let name = tag.name.clone();
        let onclick = self
            .catalog
            .navigate
            .reform(move |_: MouseEvent| Page::Tagged(name.clone()));
        html! { <button class="tag" {onclick}>{ tag.name.clone() }</button> }
    }
}

impl Component for TagsList {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (catalog, handle) = ctx
            .link()
            .context::<CatalogContext>(ctx.link().callback(Msg::ContextChanged))
            .expect("TagsList must be rendered inside a CatalogContext provider");
        let mut list = Self {
            catalog,
            _handle: handle,
            binding: ViewBinding::new(ViewScope::Tags),
        };
        list.reload(ctx);
        list
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ContextChanged(catalog) => {
                self.catalog = catalog;
                self.reload(ctx);
                true
            }
            Msg::Loaded(ticket, listing) => {
                let outcome = match listing.failure {
                    Some(failure) if failure.is_transport() => Err(failure.user_message()),
                    _ => Ok(listing.items),
                };
                self.binding.resolve(&ticket, outcome)
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let body = match self.binding.state() {
            ViewState::Idle | ViewState::Loading(_) => html! { <p class="status">{"Loading tags..."}</p> },
            ViewState::Failed(reason) => html! {
                <p class="status error">{ format!("Tags are not available yet. {reason}") }</p>
            },
            ViewState::Ready(tags) if tags.is_empty() => html! { <p class="status">{"No tags yet."}</p> },
            ViewState::Ready(tags) => html! {
                <div class="tag-list">{ for tags.iter().map(|tag| self.tag_button(tag)) }</div>
            },
        };

        html! {
            <section class="tags">
                <h2>{"Tags"}</h2>
                { body }
            </section>
        }
    }
}
