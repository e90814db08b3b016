// Selectors follow the markup backend's gallery template: one `.image-card`
// per image, holding an `img` and the `.image-name`, `.image-size` and
// `.image-date` labels. The view page marks its image with `.main-image`.

use super::{DropReason, ImageCollector, Normalized, name_from_url, resolve};
use crate::error::NormalizeError;
use crate::model::image::{ImageRecord, ImageSize, UploadedAt};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".image-card").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".image-name").unwrap());
static SIZE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".image-size").unwrap());
static DATE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".image-date").unwrap());
static MAIN_IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".main-image").unwrap());

pub(super) fn gallery(body: &str, base: Option<&Url>) -> Normalized<ImageRecord> {
    let document = Html::parse_document(body);
    let mut collector = ImageCollector::new();

    for (position, card) in document.select(&ITEM).enumerate() {
        let Some(src) = card.select(&IMAGE).next().and_then(source) else {
            collector.skip(position, DropReason::MissingSource);
            continue;
        };

        let url = resolve(base, src);
        let name = label(card, &NAME).unwrap_or_else(|| name_from_url(&url));
        let mut record = ImageRecord::new(name.clone(), name, url);
        record.size = label(card, &SIZE).map(ImageSize::Label);
        record.uploaded_at = label(card, &DATE).map(UploadedAt::Raw);
        collector.accept(position, record);
    }

    collector.finish()
}

pub(super) fn view_page(body: &str, base: Option<&Url>) -> Result<ImageRecord, NormalizeError> {
    let document = Html::parse_document(body);
    let main = document
        .select(&MAIN_IMAGE)
        .next()
        .ok_or(NormalizeError::MissingImageElement)?;

    let src = source(main)
        .or_else(|| main.select(&IMAGE).next().and_then(source))
        .ok_or(NormalizeError::MissingUrl)?;

    Ok(view_record(resolve(base, src)))
}

fn view_record(url: String) -> ImageRecord {
    let name = name_from_url(&url);
    ImageRecord::new(name.clone(), name, url)
}

fn source(element: ElementRef<'_>) -> Option<&str> {
    element
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
}

/// Trimmed text of the first `selector` match under `scope`, if non-empty.
fn label(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let text: String = scope.select(selector).next()?.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
