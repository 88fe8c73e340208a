// Store-level editing: ownership stability, undo history and persistence

use binder_planner_wasm::models::{Collection, Container, OwnershipKey, PlannerError, PlannerSettings, Segment};
use binder_planner_wasm::placement::InsertOutcome;
use binder_planner_wasm::store::{JsonFilePersistence, PlannerStore};

fn cards(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}-{}", prefix, i)).collect()
}

fn sample_collection() -> Collection {
    let mut collection = Collection::new();
    collection
        .add_container(Container::bounded("binder", "Binder", 2, 9).expect("valid binder"))
        .unwrap();
    collection.add_container(Container::unbounded("box", "Box")).unwrap();
    collection
        .add_segment(Segment::new("alpha", "Alpha", "ALP").with_cards(cards("a", 6)))
        .unwrap();
    collection
        .add_segment(Segment::new("beta", "Beta", "BET").with_cards(cards("b", 4)))
        .unwrap();
    collection
}

fn sample_store() -> PlannerStore {
    PlannerStore::with_collection(sample_collection(), PlannerSettings::default()).unwrap()
}

#[test]
fn test_ownership_follows_card_across_insert() {
    let mut store = sample_store();
    store.toggle_owned(OwnershipKey::new("alpha", 3)).unwrap();
    let owned_card = store.collection().segment("alpha").unwrap().cards[3].clone();

    let outcome = store.insert_card_at_slot("binder", 1, 2, "a-new").unwrap();
    assert_eq!(
        outcome,
        InsertOutcome::Inserted {
            segment_id: "alpha".to_string(),
            position: 1,
            consumed_spacer: false,
        }
    );

    let ledger = &store.collection().ownership;
    assert!(!ledger.is_owned(&OwnershipKey::new("alpha", 3)));
    assert!(ledger.is_owned(&OwnershipKey::new("alpha", 4)));
    assert_eq!(store.collection().segment("alpha").unwrap().cards[4], owned_card);
}

#[test]
fn test_ownership_follows_card_across_remove() {
    let mut store = sample_store();
    store.toggle_skipped(OwnershipKey::new("beta", 2)).unwrap();

    assert!(store.remove_card_at_slot("beta", 0).unwrap());
    let ledger = &store.collection().ownership;
    assert!(ledger.is_skipped(&OwnershipKey::new("beta", 1)));
    assert!(!ledger.is_skipped(&OwnershipKey::new("beta", 2)));
}

#[test]
fn test_insert_into_empty_container_is_ignored() {
    let mut store = sample_store();
    let outcome = store.insert_card_at_slot("box", 1, 1, "lost").unwrap();
    assert_eq!(outcome, InsertOutcome::NoOwningSegment);

    let outcome = store.insert_card_at_slot("binder", 3, 1, "lost").unwrap();
    assert_eq!(outcome, InsertOutcome::InvalidLocation);
    assert!(!store.can_undo());

    assert!(matches!(
        store.insert_card_at_slot("ghost", 1, 1, "lost"),
        Err(PlannerError::ContainerNotFound(_))
    ));
}

#[test]
fn test_segment_boundary_insert_appends_to_earlier_segment() {
    let mut store = sample_store();
    // alpha fills slots 1-6, beta starts at slot 7
    let outcome = store.insert_card_at_slot("binder", 1, 7, "a-tail").unwrap();
    assert_eq!(
        outcome,
        InsertOutcome::Inserted {
            segment_id: "alpha".to_string(),
            position: 6,
            consumed_spacer: false,
        }
    );
    assert_eq!(store.placement().placement_of("beta", 0).unwrap().slot, 8);
}

#[test]
fn test_undo_restores_every_edit_kind() {
    let mut store = sample_store();
    let initial = store.collection().clone();
    let initial_placement = store.placement().clone();

    store.add_spacer("alpha", 2).unwrap();
    store.set_segment_offset("beta", 4).unwrap();
    store.set_segment_target("beta", Some("box".to_string())).unwrap();
    store.toggle_owned(OwnershipKey::new("beta", 1)).unwrap();
    store.insert_card_at_slot("binder", 1, 1, "front").unwrap();
    store.remove_card_at_slot("alpha", 5).unwrap();
    store.remove_spacer("alpha", 3).unwrap();

    while store.can_undo() {
        store.undo().unwrap();
    }
    assert_eq!(store.collection().segments, initial.segments);
    assert_eq!(store.collection().ownership, initial.ownership);
    assert_eq!(store.placement(), &initial_placement);
    assert_eq!(store.undo(), Err(PlannerError::NothingToUndo));

    let mut redone = 0;
    while store.can_redo() {
        store.redo().unwrap();
        redone += 1;
    }
    assert_eq!(redone, 7);
    assert_eq!(store.collection().segment("beta").unwrap().offset, 4);
}

#[test]
fn test_new_edit_clears_redo() {
    let mut store = sample_store();
    store.add_spacer("alpha", 1).unwrap();
    store.undo().unwrap();
    assert!(store.can_redo());

    store.add_spacer("alpha", 2).unwrap();
    assert!(!store.can_redo());
    assert_eq!(store.redo(), Err(PlannerError::NothingToRedo));
}

#[test]
fn test_history_is_bounded() {
    let settings = PlannerSettings {
        undo_history_size: 3,
        ..Default::default()
    };
    let mut store = PlannerStore::with_collection(sample_collection(), settings).unwrap();
    for _ in 0..5 {
        store.add_spacer("alpha", 1).unwrap();
    }

    let mut undone = 0;
    while store.can_undo() {
        store.undo().unwrap();
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(store.collection().segment("alpha").unwrap().spacers.get(&1), Some(&2));
}

#[test]
fn test_edits_are_saved_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.json");

    let mut store = PlannerStore::open(Box::new(JsonFilePersistence::new(&path)), PlannerSettings::default()).unwrap();
    assert!(store.collection().segments.is_empty());
    store.add_container(Container::unbounded("box", "Box")).unwrap();
    store
        .add_segment(Segment::new("s", "Set", "SET").with_cards(cards("c", 3)))
        .unwrap();
    store.add_spacer("s", 1).unwrap();
    store.toggle_owned(OwnershipKey::new("s", 2)).unwrap();

    let reopened = PlannerStore::open(Box::new(JsonFilePersistence::new(&path)), PlannerSettings::default()).unwrap();
    assert_eq!(reopened.collection().segments, store.collection().segments);
    assert_eq!(reopened.collection().ownership, store.collection().ownership);
    assert_eq!(reopened.placement(), store.placement());
    assert_eq!(reopened.snapshot().owned_cards, 1);
}
