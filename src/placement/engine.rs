//! Placement engine
//!
//! Maps ordered segments onto the slots of ordered containers as one
//! continuous fill. Each container keeps a next-free-slot counter that is
//! shared by every segment within a single pass and reset on every call, so
//! the result depends only on the inputs.
//!
//! Per segment:
//! 1. Resolve the target container (unknown ids mean no target)
//! 2. Reserve `offset` blanks in the target, or in the first container with room
//! 3. For each card, reserve its spacers plus one slot in the target if it
//!    fits, else in the first container after the target that fits; a card
//!    that fits nowhere counts as overflow

use serde::{Deserialize, Serialize};

use crate::models::{CardLookup, Container, OwnershipKey, Segment, SlotLocation};

/// One card occurrence assigned to one slot
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub card_id: String,
    pub segment_id: String,
    /// Index into the segment's card sequence
    pub position: usize,
    pub container_id: String,
    /// Index of the container in the fill order
    pub container_index: usize,
    pub page: usize,
    pub slot: usize,
}

impl Placement {
    pub fn ownership_key(&self) -> OwnershipKey {
        OwnershipKey::new(self.segment_id.clone(), self.position)
    }

    pub fn location(&self) -> SlotLocation {
        SlotLocation {
            page: self.page,
            slot: self.slot,
        }
    }
}

/// Cards of one segment that found no slot
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverflowRecord {
    pub segment_id: String,
    pub segment_name: String,
    pub overflow_count: usize,
}

/// Fill level of one container after a pass
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerUsage {
    pub container_id: String,
    pub capacity: usize,
    /// Cards placed in this container
    pub placed: usize,
    /// Slots consumed by cards, spacers and offsets (never above capacity)
    pub slots_used: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    /// In segment order, then position order (not slot order)
    pub placements: Vec<Placement>,
    pub overflow: Vec<OverflowRecord>,
    /// Sum of all segment lengths, overflowed and unresolved cards included
    pub total_cards: usize,
    /// Sum of container capacities (saturating)
    pub total_capacity: usize,
    /// Positions skipped because the card lookup did not resolve them
    ///
    /// With a lookup, `placements.len() + overflow_count() + unresolved_cards == total_cards`.
    pub unresolved_cards: usize,
    /// One entry per container, in fill order
    pub usage: Vec<ContainerUsage>,
}

impl PlacementResult {
    pub fn overflow_count(&self) -> usize {
        self.overflow.iter().map(|o| o.overflow_count).sum()
    }

    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }

    /// Placements that landed in one container, in production order
    pub fn placements_in<'a>(&'a self, container_id: &'a str) -> impl Iterator<Item = &'a Placement> + 'a {
        self.placements.iter().filter(move |p| p.container_id == container_id)
    }

    /// Where a card occurrence ended up, if it was placed
    pub fn placement_of(&self, segment_id: &str, position: usize) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|p| p.segment_id == segment_id && p.position == position)
    }
}

/// Per-pass counters, one per container in fill order
struct FillState<'a> {
    containers: &'a [&'a Container],
    next_free: Vec<usize>,
    placed: Vec<usize>,
}

impl<'a> FillState<'a> {
    fn new(containers: &'a [&'a Container]) -> Self {
        Self {
            containers,
            next_free: vec![0; containers.len()],
            placed: vec![0; containers.len()],
        }
    }

    fn remaining(&self, index: usize) -> usize {
        self.containers[index].capacity().saturating_sub(self.next_free[index])
    }

    /// First container at or after `from` with at least `needed` free slots
    fn first_with_room(&self, from: usize, needed: usize) -> Option<usize> {
        (from..self.containers.len()).find(|&i| self.remaining(i) >= needed)
    }

    fn destination(&self, target: Option<usize>, needed: usize) -> Option<usize> {
        match target {
            Some(t) if self.remaining(t) >= needed => Some(t),
            Some(t) => self.first_with_room(t + 1, needed),
            None => self.first_with_room(0, needed),
        }
    }

    fn usage(&self) -> Vec<ContainerUsage> {
        self.containers
            .iter()
            .enumerate()
            .map(|(i, c)| ContainerUsage {
                container_id: c.id.clone(),
                capacity: c.capacity(),
                placed: self.placed[i],
                slots_used: self.next_free[i].min(c.capacity()),
            })
            .collect()
    }
}

/// Run a full placement pass
///
/// With a `lookup`, positions whose card id it cannot resolve are skipped:
/// they produce no placement, no overflow and consume none of their spacers,
/// but they keep their position for ownership numbering and count toward
/// `total_cards`.
pub fn compute_placement(
    segments: &[&Segment],
    containers: &[&Container],
    lookup: Option<&dyn CardLookup>,
) -> PlacementResult {
    let mut state = FillState::new(containers);
    let mut result = PlacementResult {
        total_cards: segments.iter().map(|s| s.len()).sum(),
        total_capacity: containers
            .iter()
            .fold(0usize, |acc, c| acc.saturating_add(c.capacity())),
        ..Default::default()
    };

    for segment in segments {
        let target = segment
            .target_container_id
            .as_deref()
            .and_then(|id| containers.iter().position(|c| c.id == id));

        if segment.offset > 0 {
            let reserve_in = target.or_else(|| state.first_with_room(0, 1));
            if let Some(index) = reserve_in {
                state.next_free[index] += segment.offset as usize;
            }
        }

        let mut overflow = 0;
        for (position, card_id) in segment.cards.iter().enumerate() {
            if let Some(lookup) = lookup {
                if !lookup.is_resolved(card_id) {
                    result.unresolved_cards += 1;
                    continue;
                }
            }

            let spacers = segment.spacer_count_before(position) as usize;
            let Some(index) = state.destination(target, spacers + 1) else {
                overflow += 1;
                continue;
            };

            let container = containers[index];
            state.next_free[index] += spacers;
            let location = container.slot_index_to_location(state.next_free[index]);
            state.next_free[index] += 1;
            state.placed[index] += 1;

            result.placements.push(Placement {
                card_id: card_id.clone(),
                segment_id: segment.id.clone(),
                position,
                container_id: container.id.clone(),
                container_index: index,
                page: location.page,
                slot: location.slot,
            });
        }

        if overflow > 0 {
            log::warn!(
                "Segment '{}' overflowed by {} card(s)",
                segment.name,
                overflow
            );
            result.overflow.push(OverflowRecord {
                segment_id: segment.id.clone(),
                segment_name: segment.name.clone(),
                overflow_count: overflow,
            });
        }
    }

    result.usage = state.usage();
    log::debug!(
        "Placement: {} placed, {} overflow, {} unresolved of {} cards across {} container(s)",
        result.placements.len(),
        result.overflow_count(),
        result.unresolved_cards,
        result.total_cards,
        containers.len()
    );
    result
}

/// Convenience wrapper over owned slices, with every card treated as resolved
pub fn place(segments: &[Segment], containers: &[Container]) -> PlacementResult {
    let segments: Vec<&Segment> = segments.iter().collect();
    let containers: Vec<&Container> = containers.iter().collect();
    compute_placement(&segments, &containers, None)
}
