// End-to-end placement behavior over public types

use binder_planner_wasm::models::{CardCatalog, CardLookup, CardRecord, Container, Segment, SlotLocation};
use binder_planner_wasm::placement::{compute_placement, place};

fn cards(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}-{}", prefix, i)).collect()
}

fn binder(id: &str, pages: usize) -> Container {
    Container::bounded(id, id.to_uppercase(), pages, 9).expect("valid binder")
}

#[test]
fn test_overflow_when_binder_is_too_small() {
    let segment = Segment::new("s", "Alpha", "ALP").with_cards(cards("a", 20));
    let result = place(&[segment], &[binder("b", 2)]);

    assert_eq!(result.placements.len(), 18);
    assert_eq!(result.overflow.len(), 1);
    assert_eq!(result.overflow[0].segment_id, "s");
    assert_eq!(result.overflow[0].overflow_count, 2);
    assert_eq!(result.total_capacity, 18);
    assert_eq!(result.total_cards, 20);
}

#[test]
fn test_offset_reserves_leading_slots() {
    let mut segment = Segment::new("s", "Alpha", "ALP").with_cards(cards("a", 20));
    segment.offset = 3;
    let result = place(&[segment], &[binder("b", 2)]);

    assert_eq!(result.placements[0].location(), SlotLocation { page: 1, slot: 4 });
    assert_eq!(result.placements.len(), 15);
    assert_eq!(result.overflow_count(), 5);
}

#[test]
fn test_spacer_leaves_blank_slot() {
    let mut segment = Segment::new("s", "Alpha", "ALP").with_cards(cards("a", 5));
    segment.add_spacer(2);
    let result = place(&[segment], &[Container::unbounded("box", "Box")]);

    let slots: Vec<usize> = result.placements.iter().map(|p| p.slot).collect();
    assert_eq!(slots, vec![1, 2, 4, 5, 6]);
    assert!(result.placements.iter().all(|p| p.page == 1));
}

#[test]
fn test_inserted_card_takes_spacer_slot() {
    let mut segment = Segment::new("s", "Alpha", "ALP").with_cards(cards("a", 5));
    segment.add_spacer(2);
    let inserted = segment.insert_card("new", Some(2));

    assert!(inserted.consumed_spacer);
    assert!(segment.spacers.is_empty());

    let result = place(&[segment], &[Container::unbounded("box", "Box")]);
    let placed = result.placement_of("s", 2).expect("new card placed");
    assert_eq!(placed.card_id, "new");
    assert_eq!(placed.slot, 3);
}

#[test]
fn test_full_target_sends_segment_to_later_container() {
    let first = Segment::new("first", "First", "ONE").with_cards(cards("f", 9));
    let mut second = Segment::new("second", "Second", "TWO").with_cards(cards("s", 2));
    second.target_container_id = Some("a".to_string());

    let result = place(&[first.clone(), second.clone()], &[binder("a", 1), binder("b", 1)]);
    assert!(!result.has_overflow());
    assert!(result.placements_in("b").all(|p| p.segment_id == "second"));

    let only_a = place(&[first, second], &[binder("a", 1)]);
    assert_eq!(only_a.overflow.len(), 1);
    assert_eq!(only_a.overflow[0].segment_id, "second");
    assert_eq!(only_a.overflow[0].overflow_count, 2);
}

#[test]
fn test_every_card_placed_or_overflowed() {
    let mut alpha = Segment::new("a", "Alpha", "ALP").with_cards(cards("a", 17));
    alpha.add_spacer(4);
    alpha.add_spacer(4);
    alpha.offset = 2;
    let mut beta = Segment::new("b", "Beta", "BET").with_cards(cards("b", 25));
    beta.target_container_id = Some("small".to_string());
    let gamma = Segment::new("g", "Gamma", "GAM").with_cards(cards("g", 11));

    let containers = [binder("small", 1), binder("large", 3)];
    let result = place(&[alpha, beta, gamma], &containers);

    assert_eq!(result.placements.len() + result.overflow_count(), 53);
    for usage in &result.usage {
        assert!(usage.slots_used <= usage.capacity);
        assert!(usage.placed <= usage.slots_used);
    }

    let mut occupied: Vec<(String, usize, usize)> = result
        .placements
        .iter()
        .map(|p| (p.container_id.clone(), p.page, p.slot))
        .collect();
    occupied.sort();
    occupied.dedup();
    assert_eq!(occupied.len(), result.placements.len());
}

#[test]
fn test_placement_is_deterministic() {
    let mut segment = Segment::new("s", "Alpha", "ALP").with_cards(cards("a", 30));
    segment.add_spacer(7);
    segment.offset = 1;
    let containers = [binder("b", 2), Container::unbounded("box", "Box")];

    let first = place(&[segment.clone()], &containers);
    let second = place(&[segment], &containers);
    assert_eq!(first, second);
}

#[test]
fn test_unresolved_cards_skipped_with_catalog() {
    let mut catalog = CardCatalog::new();
    catalog.register(vec![CardRecord {
        id: "a-0".to_string(),
        name: "Known".to_string(),
        set_code: "ALP".to_string(),
        collector_number: "1".to_string(),
        image_url: None,
    }]);

    let mut segment = Segment::new("s", "Alpha", "ALP").with_cards(cards("a", 3));
    segment.add_spacer(1);
    let container = Container::unbounded("box", "Box");

    let result = compute_placement(&[&segment], &[&container], Some(&catalog as &dyn CardLookup));
    assert_eq!(result.placements.len(), 1);
    assert_eq!(result.unresolved_cards, 2);
    assert_eq!(
        result.placements.len() + result.overflow_count() + result.unresolved_cards,
        result.total_cards
    );
    assert_eq!(result.total_cards, 3);
    assert!(!result.has_overflow());
}
