use super::*;
use crate::error::{CatalogError, TransportError};

fn image(id: &str) -> ImageRecord {
    ImageRecord::new(id, format!("{id}.png"), format!("http://img/{id}.png"))
}

fn listing(ids: &[&str]) -> Listing<ImageRecord> {
    Listing {
        items: ids.iter().map(|id| image(id)).collect(),
        dropped: Vec::new(),
        failure: None,
    }
}

fn snapshot_ids(binding: &ViewBinding<CatalogSnapshot>) -> Vec<String> {
    binding
        .current()
        .map(|s| s.images().iter().map(|i| i.id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn first_observation_starts_the_initial_load() {
    let coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Gallery);

    let ticket = binding.observe(&coordinator).expect("initial load");

    assert_eq!(ticket.generation(), Generation::INITIAL);
    assert_eq!(binding.state(), &ViewState::Loading(Generation::INITIAL));
}

#[test]
fn observing_without_a_bump_issues_no_read() {
    let coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Gallery);

    let ticket = binding.observe(&coordinator).unwrap();
    assert!(binding.observe(&coordinator).is_none());

    binding.resolve_listing(&ticket, listing(&["a"]));
    assert!(binding.observe(&coordinator).is_none());
    assert!(binding.observe(&coordinator).is_none());
}

#[test]
fn a_bump_triggers_exactly_one_reload() {
    let mut coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Gallery);
    let first = binding.observe(&coordinator).unwrap();
    binding.resolve_listing(&first, listing(&[]));

    coordinator.record(&Mutation::Uploaded {
        image_id: "img-42".into(),
    });

    let second = binding.observe(&coordinator).expect("reload after bump");
    assert_eq!(second.generation(), Generation::INITIAL.next());
    assert!(binding.observe(&coordinator).is_none());

    assert!(binding.resolve_listing(&second, listing(&["img-42"])));
    assert_eq!(snapshot_ids(&binding), vec!["img-42"]);
    assert_eq!(
        binding.current().unwrap().generation(),
        Generation::INITIAL.next()
    );
}

#[test]
fn older_generation_resolving_last_is_discarded() {
    let mut coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Gallery);

    let g1 = binding.observe(&coordinator).unwrap();
    coordinator.record(&Mutation::Deleted {
        image_id: "old".into(),
    });
    let g2 = binding.observe(&coordinator).unwrap();
    assert!(g2.generation() > g1.generation());

    assert!(binding.resolve_listing(&g2, listing(&["new"])));
    assert!(!binding.resolve_listing(&g1, listing(&["old", "new"])));

    assert_eq!(snapshot_ids(&binding), vec!["new"]);
}

#[test]
fn older_generation_resolving_first_is_discarded_too() {
    let mut coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Gallery);

    let g1 = binding.observe(&coordinator).unwrap();
    coordinator.record(&Mutation::Uploaded {
        image_id: "b".into(),
    });
    let g2 = binding.observe(&coordinator).unwrap();

    assert!(!binding.resolve_listing(&g1, listing(&["a"])));
    assert!(binding.is_loading());

    assert!(binding.resolve_listing(&g2, listing(&["a", "b"])));
    assert_eq!(snapshot_ids(&binding), vec!["a", "b"]);
}

#[test]
fn a_ticket_applies_only_once() {
    let coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Gallery);
    let ticket = binding.observe(&coordinator).unwrap();

    assert!(binding.resolve_listing(&ticket, listing(&["a"])));
    assert!(!binding.resolve_listing(&ticket, listing(&["b"])));
    assert_eq!(snapshot_ids(&binding), vec!["a"]);
}

#[test]
fn unreachable_backend_fails_the_view() {
    let coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Gallery);
    let ticket = binding.observe(&coordinator).unwrap();

    let failed = Listing::failed(CatalogError::from(TransportError::Connection(
        "refused".into(),
    )));
    binding.resolve_listing(&ticket, failed);

    assert!(matches!(binding.state(), ViewState::Failed(reason) if reason.contains("refused")));
}

#[test]
fn unusable_payload_degrades_to_an_empty_snapshot() {
    let coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Tagged("cat".into()));
    let ticket = binding.observe(&coordinator).unwrap();

    binding.resolve_listing(&ticket, Listing::failed(CatalogError::not_found("tag 'cat'")));

    let snapshot = binding.current().expect("ready");
    assert!(snapshot.is_empty());
}

#[test]
fn retry_reissues_the_failed_generation_only() {
    let coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<ImageRecord>::new(ViewScope::Detail("a".into()));
    let ticket = binding.observe(&coordinator).unwrap();
    assert!(binding.retry().is_none());

    binding.resolve(&ticket, Err("server answered with status 503".into()));
    let retry = binding.retry().expect("retry after failure");
    assert_eq!(retry.generation(), ticket.generation());

    assert!(binding.resolve(&retry, Ok(image("a"))));
    assert!(binding.retry().is_none());
}

#[test]
fn tag_edits_invalidate_the_detail_and_the_catalog() {
    let mut coordinator = RefreshCoordinator::new();
    let mut detail = ViewBinding::<ImageRecord>::new(ViewScope::Detail("a".into()));
    let mut other = ViewBinding::<ImageRecord>::new(ViewScope::Detail("b".into()));
    let mut tags = ViewBinding::<Vec<String>>::new(ViewScope::Tags);
    let d = detail.observe(&coordinator).unwrap();
    let o = other.observe(&coordinator).unwrap();
    let t = tags.observe(&coordinator).unwrap();
    detail.resolve(&d, Ok(image("a")));
    other.resolve(&o, Ok(image("b")));
    tags.resolve(&t, Ok(vec![]));

    coordinator.record(&Mutation::TagsAdded {
        image_id: "a".into(),
    });

    assert!(detail.observe(&coordinator).is_some());
    assert!(other.observe(&coordinator).is_none());
    assert!(tags.observe(&coordinator).is_some());
}

#[test]
fn uploads_leave_details_alone() {
    let mut coordinator = RefreshCoordinator::new();
    let before = coordinator.generation(&ViewScope::Detail("a".into()));

    coordinator.record(&Mutation::Uploaded {
        image_id: "a".into(),
    });

    assert_eq!(coordinator.generation(&ViewScope::Detail("a".into())), before);
    assert_eq!(
        coordinator.generation(&ViewScope::Tagged("any".into())),
        Generation::INITIAL.next()
    );
}

#[test]
fn rebinding_rejects_tickets_for_the_previous_scope() {
    let coordinator = RefreshCoordinator::new();
    let mut binding = ViewBinding::<CatalogSnapshot>::new(ViewScope::Tagged("cat".into()));
    let cat = binding.observe(&coordinator).unwrap();

    binding.rebind(ViewScope::Tagged("dog".into()));
    assert_eq!(binding.state(), &ViewState::Idle);
    let dog = binding.observe(&coordinator).expect("load for new scope");

    assert!(!binding.resolve_listing(&cat, listing(&["c"])));
    assert!(binding.resolve_listing(&dog, listing(&["d"])));
    assert_eq!(snapshot_ids(&binding), vec!["d"]);
}

#[test]
fn generations_are_monotonic() {
    let mut coordinator = RefreshCoordinator::new();
    let mut seen = vec![coordinator.generation(&ViewScope::Gallery)];
    for n in 0..5 {
        coordinator.record(&Mutation::Deleted {
            image_id: format!("img-{n}"),
        });
        seen.push(coordinator.generation(&ViewScope::Gallery));
    }

    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(Mutation::Deleted { image_id: "x".into() }.image_id(), "x");
}
