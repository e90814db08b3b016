//! Rendering shared by the gallery and tag-filtered views.

use crate::app::Page;
use common::model::image::ImageRecord;
use common::model::snapshot::CatalogSnapshot;
use common::refresh::{ViewBinding, ViewState};
use yew::prelude::*;

/// Tags shown on a card before the rest are elided.
const CARD_TAGS: usize = 3;

pub fn image_card(image: &ImageRecord, navigate: &Callback<Page>) -> Html {
    let onclick = {
        let navigate = navigate.clone();
        let id = image.id.clone();
        Callback::from(move |_: MouseEvent| navigate.emit(Page::Detail(id.clone())))
    };
    let hidden = image.tags.len().saturating_sub(CARD_TAGS);

    html! {
        <div class="image-card" {onclick}>
            <img src={image.url.clone()} alt={image.name.clone()} loading="lazy" />
            <p class="image-name">{ image.name.clone() }</p>
            if let Some(size) = &image.size {
                <p class="image-size">{ size.to_string() }</p>
            }
            if let Some(uploaded_at) = &image.uploaded_at {
                <p class="image-date">{ uploaded_at.to_string() }</p>
            }
            <div class="image-tags">
                { for image.leading_tags(CARD_TAGS).iter().map(|tag| html! { <span class="tag">{ tag.clone() }</span> }) }
                if hidden > 0 {
                    <span class="tag more">{ format!("+{hidden}") }</span>
                }
            </div>
        </div>
    }
}

/// Loading, failure, empty and populated states of a snapshot binding.
pub fn snapshot_view(
    binding: &ViewBinding<CatalogSnapshot>,
    navigate: &Callback<Page>,
    empty_text: &str,
) -> Html {
    match binding.state() {
        ViewState::Idle | ViewState::Loading(_) => html! { <p class="status">{"Loading images..."}</p> },
        ViewState::Failed(reason) => html! {
            <p class="status error">{ format!("Images are not available yet. {reason}") }</p>
        },
        ViewState::Ready(snapshot) if snapshot.is_empty() => {
            html! { <p class="status">{ empty_text }</p> }
        }
        ViewState::Ready(snapshot) => html! {
            <div class="image-grid">
                { for snapshot.images().iter().map(|image| image_card(image, navigate)) }
            </div>
        },
    }
}
