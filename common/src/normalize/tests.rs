use super::*;
use crate::model::image::{ImageSize, UploadedAt};
use serde_json::json;

fn json(value: Value) -> RawResponse {
    RawResponse::Json(value)
}

fn markup(body: &str) -> RawResponse {
    RawResponse::Markup(body.to_string())
}

const GALLERY: &str = r#"
<html><body>
  <div class="gallery">
    <div class="image-card">
      <img src="http://localhost:9000/code/a.png">
      <p class="image-name">a.png</p>
      <p class="image-size">1.50 KB</p>
      <p class="image-date">2024-03-01 10:15:00</p>
    </div>
    <div class="image-card">
      <p class="image-name">broken.png</p>
    </div>
    <div class="image-card">
      <img src="/code/b.jpg">
      <p class="image-name"> b.jpg </p>
    </div>
  </div>
</body></html>
"#;

#[test]
fn json_array_keeps_order_and_drops_items_without_url() {
    let raw = json(json!([
        {"id": "1", "name": "one.png", "url": "http://img/one.png"},
        {"id": "2", "name": "two.png"},
        {"id": "3", "name": "three.png", "src": "http://img/three.png"},
    ]));

    let out = Normalizer::new().normalize_list(&raw);

    let ids: Vec<&str> = out.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(
        out.dropped,
        vec![Diagnostic {
            position: 1,
            reason: DropReason::MissingUrl
        }]
    );
}

#[test]
fn json_fields_pass_through() {
    let raw = json(json!([{
        "id": 42,
        "name": "cat.jpg",
        "url": "http://img/cat.jpg",
        "size": 2048,
        "contentType": "image/jpeg",
        "uploadedAt": "2024-03-01T10:15:00Z",
        "tags": [" cat ", "pet", "cat", ""]
    }]));

    let image = &Normalizer::new().normalize_list(&raw).items[0];

    assert_eq!(image.id, "42");
    assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(image.size, Some(ImageSize::Bytes(2048)));
    assert!(matches!(image.uploaded_at, Some(UploadedAt::Instant(_))));
    assert_eq!(image.tags, vec!["cat", "pet"]);
}

#[test]
fn missing_id_and_name_are_derived_from_url() {
    let raw = json(json!([{"url": "http://img/bucket/photo.png?sig=abc"}]));

    let image = &Normalizer::new().normalize_list(&raw).items[0];

    assert_eq!(image.name, "photo.png");
    assert_eq!(image.id, "photo.png");
}

#[test]
fn non_object_elements_are_dropped() {
    let raw = json(json!(["http://img/a.png", null, {"url": "http://img/b.png"}]));

    let out = Normalizer::new().normalize_list(&raw);

    assert_eq!(out.items.len(), 1);
    assert_eq!(out.dropped.len(), 2);
    assert!(out.dropped.iter().all(|d| d.reason == DropReason::NotAnObject));
}

#[test]
fn duplicate_ids_keep_the_first_record() {
    let raw = json(json!([
        {"id": "x", "url": "http://img/1.png"},
        {"id": "x", "url": "http://img/2.png"},
    ]));

    let out = Normalizer::new().normalize_list(&raw);

    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].url, "http://img/1.png");
    assert_eq!(out.dropped[0].reason, DropReason::DuplicateId("x".into()));
}

#[test]
fn non_array_json_normalizes_to_nothing() {
    let normalizer = Normalizer::new();
    for value in [
        json!(null),
        json!({"error": "database unavailable"}),
        json!({"images": [{"url": "http://img/a.png"}]}),
        json!("images"),
        json!(7),
    ] {
        let out = normalizer.normalize_list(&json(value));
        assert!(out.items.is_empty());
        assert!(out.dropped.is_empty());
    }
}

#[test]
fn gallery_markup_yields_one_record_per_sourced_card() {
    let base = Url::parse("http://localhost:8080").unwrap();
    let out = Normalizer::with_base(base).normalize_list(&markup(GALLERY));

    assert_eq!(out.items.len(), 2);
    assert_eq!(
        out.dropped,
        vec![Diagnostic {
            position: 1,
            reason: DropReason::MissingSource
        }]
    );

    let first = &out.items[0];
    assert_eq!(first.id, "a.png");
    assert_eq!(first.url, "http://localhost:9000/code/a.png");
    assert_eq!(first.size, Some(ImageSize::Label("1.50 KB".into())));
    assert_eq!(
        first.uploaded_at,
        Some(UploadedAt::Raw("2024-03-01 10:15:00".into()))
    );

    let second = &out.items[1];
    assert_eq!(second.name, "b.jpg");
    assert_eq!(second.url, "http://localhost:8080/code/b.jpg");
    assert_eq!(second.size, None);
}

#[test]
fn gallery_markup_without_base_keeps_sources_verbatim() {
    let out = Normalizer::new().normalize_list(&markup(GALLERY));

    assert_eq!(out.items[1].url, "/code/b.jpg");
}

#[test]
fn markup_without_cards_is_empty() {
    let out = Normalizer::new().normalize_list(&markup("<html><body><p>No images</p></body></html>"));

    assert!(out.items.is_empty());
    assert!(out.dropped.is_empty());
}

#[test]
fn normalization_is_repeatable() {
    let normalizer = Normalizer::with_base(Url::parse("http://localhost:8080").unwrap());
    let raw = markup(GALLERY);

    assert_eq!(normalizer.normalize_list(&raw), normalizer.normalize_list(&raw));

    let raw = json(json!([{"id": "1", "url": "u", "tags": ["a"]}, {"id": "2"}]));
    assert_eq!(normalizer.normalize_list(&raw), normalizer.normalize_list(&raw));
}

#[test]
fn single_json_object_normalizes() {
    let raw = json(json!({"id": "img-1", "name": "a.png", "url": "http://img/a.png"}));

    let image = Normalizer::new().normalize_one(&raw).unwrap();

    assert_eq!(image.id, "img-1");
}

#[test]
fn view_json_answer_uses_image_url_and_filename() {
    let raw = json(json!({"imageUrl": "http://localhost:9000/code/a.png", "filename": "a.png"}));

    let image = Normalizer::new().normalize_one(&raw).unwrap();

    assert_eq!(image.url, "http://localhost:9000/code/a.png");
    assert_eq!(image.name, "a.png");
    assert_eq!(image.id, "a.png");
}

#[test]
fn single_item_errors_propagate() {
    let normalizer = Normalizer::new();

    assert_eq!(
        normalizer.normalize_one(&json(json!([]))),
        Err(NormalizeError::NotAnObject)
    );
    assert_eq!(
        normalizer.normalize_one(&json(json!({"id": "1"}))),
        Err(NormalizeError::MissingUrl)
    );
    assert_eq!(
        normalizer.normalize_one(&markup("<html><img src=\"x.png\"></html>")),
        Err(NormalizeError::MissingImageElement)
    );
}

#[test]
fn view_page_reads_main_image_source() {
    let page = r#"<html><body><h1>a.png</h1><img class="main-image" src="/code/a.png"></body></html>"#;
    let normalizer = Normalizer::with_base(Url::parse("http://localhost:8080/").unwrap());

    let image = normalizer.normalize_one(&markup(page)).unwrap();

    assert_eq!(image.url, "http://localhost:8080/code/a.png");
    assert_eq!(image.id, "a.png");
}

#[test]
fn view_page_accepts_wrapped_main_image() {
    let page = r#"<div class="main-image"><img src="http://cdn/x.gif"></div>"#;

    let image = Normalizer::new().normalize_one(&markup(page)).unwrap();

    assert_eq!(image.url, "http://cdn/x.gif");
}

#[test]
fn tags_accept_objects_and_strings() {
    let raw = json(json!([
        {"id": 1, "name": "cat"},
        " pet ",
        {"id": 3, "name": "cat"},
        {"id": 4, "name": "  "},
        17,
    ]));

    let out = Normalizer::new().normalize_tags(&raw);

    assert_eq!(
        out.items,
        vec![
            TagRecord {
                name: "cat".into(),
                id: Some("1".into())
            },
            TagRecord::named("pet"),
        ]
    );
    let reasons: Vec<DropReason> = out.dropped.into_iter().map(|d| d.reason).collect();
    assert_eq!(
        reasons,
        vec![
            DropReason::DuplicateTag("cat".into()),
            DropReason::EmptyTagName,
            DropReason::NotAnObject,
        ]
    );
}

#[test]
fn tags_from_non_array_payloads_are_empty() {
    let normalizer = Normalizer::new();

    assert!(normalizer.normalize_tags(&json(json!({"error": "x"}))).items.is_empty());
    assert!(normalizer.normalize_tags(&markup("<ul><li>cat</li></ul>")).items.is_empty());
}

#[test]
fn replies_are_classified_by_content_type_then_body() {
    assert!(matches!(
        RawResponse::classify(Some("text/html; charset=utf-8"), "{}"),
        Ok(RawResponse::Markup(_))
    ));
    assert!(matches!(
        RawResponse::classify(None, "  <html></html>"),
        Ok(RawResponse::Markup(_))
    ));
    assert_eq!(
        RawResponse::classify(Some("application/json"), ""),
        Ok(RawResponse::Json(Value::Null))
    );
    assert!(matches!(
        RawResponse::classify(Some("application/json"), "{oops"),
        Err(NormalizeError::InvalidJson(_))
    ));
}

#[test]
fn upload_location_becomes_a_record() {
    let image = Normalizer::new().record_from_url("http://localhost:9000/code/cat.png");

    assert_eq!(image.id, "cat.png");
    assert_eq!(image.name, "cat.png");
    assert!(image.tags.is_empty());
}

#[test]
fn diagnostics_describe_the_drop() {
    let diagnostic = Diagnostic {
        position: 3,
        reason: DropReason::DuplicateId("a".into()),
    };
    assert_eq!(diagnostic.to_string(), "item 3: duplicate id 'a'");
}
