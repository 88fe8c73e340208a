//! Slot-level edits
//!
//! Inserting at a slot works from the latest placement result: the cards
//! around the slot decide which segment receives the new card and where in
//! its sequence it goes. The caller re-runs placement afterwards.

use serde::{Deserialize, Serialize};

use super::engine::PlacementResult;
use crate::models::{Collection, Container, PlannerResult, RemovedCard};

/// Where a card inserted at a slot belongs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InsertionPoint {
    /// Before an existing card of the owning segment
    #[serde(rename_all = "camelCase")]
    Before { segment_id: String, position: usize },
    /// At the end of the owning segment
    #[serde(rename_all = "camelCase")]
    Append { segment_id: String },
    /// The page/slot pair does not exist in the container
    InvalidLocation,
    /// No placed card in the container to take ownership from
    NoOwningSegment,
}

/// Result of [`insert_card_at_slot`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InsertOutcome {
    #[serde(rename_all = "camelCase")]
    Inserted {
        segment_id: String,
        position: usize,
        consumed_spacer: bool,
    },
    InvalidLocation,
    NoOwningSegment,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted { .. })
    }
}

/// Decide which segment and position a card inserted at (page, slot) belongs to
///
/// "Before" is the last card placed at a lower index in the container,
/// "after" the first card at the target index or higher, so the card
/// currently in the slot counts as "after".
pub fn resolve_insertion(result: &PlacementResult, container: &Container, page: usize, slot: usize) -> InsertionPoint {
    let Some(target) = container.location_to_slot_index(page, slot) else {
        return InsertionPoint::InvalidLocation;
    };

    let mut in_container: Vec<(usize, &str, usize)> = result
        .placements_in(&container.id)
        .filter_map(|p| {
            container
                .location_to_slot_index(p.page, p.slot)
                .map(|index| (index, p.segment_id.as_str(), p.position))
        })
        .collect();
    in_container.sort_by_key(|&(index, _, _)| index);

    let before = in_container.iter().rev().find(|&&(index, _, _)| index < target);
    let after = in_container.iter().find(|&&(index, _, _)| index >= target);

    match (before, after) {
        (None, None) => InsertionPoint::NoOwningSegment,
        (Some(&(_, before_seg, _)), Some(&(_, after_seg, after_pos))) if before_seg == after_seg => {
            InsertionPoint::Before {
                segment_id: after_seg.to_string(),
                position: after_pos,
            }
        }
        (Some(&(_, before_seg, _)), _) => InsertionPoint::Append {
            segment_id: before_seg.to_string(),
        },
        (None, Some(&(_, after_seg, after_pos))) => InsertionPoint::Before {
            segment_id: after_seg.to_string(),
            position: after_pos,
        },
    }
}

/// Insert a new card at a slot of a container
///
/// Unknown containers are errors; unusable slots are reported in the outcome.
pub fn insert_card_at_slot(
    collection: &mut Collection,
    result: &PlacementResult,
    container_id: &str,
    page: usize,
    slot: usize,
    card_id: &str,
) -> PlannerResult<InsertOutcome> {
    let container = collection.container(container_id)?;
    let (segment_id, before) = match resolve_insertion(result, container, page, slot) {
        InsertionPoint::Before { segment_id, position } => (segment_id, Some(position)),
        InsertionPoint::Append { segment_id } => (segment_id, None),
        InsertionPoint::InvalidLocation => {
            log::debug!("Insert at {}/{}/{} ignored: no such slot", container_id, page, slot);
            return Ok(InsertOutcome::InvalidLocation);
        }
        InsertionPoint::NoOwningSegment => {
            log::debug!("Insert at {}/{}/{} ignored: container is empty", container_id, page, slot);
            return Ok(InsertOutcome::NoOwningSegment);
        }
    };

    let inserted = collection.insert_card(&segment_id, card_id, before)?;
    log::info!(
        "Inserted '{}' into segment {} at position {}",
        card_id,
        segment_id,
        inserted.position
    );
    Ok(InsertOutcome::Inserted {
        segment_id,
        position: inserted.position,
        consumed_spacer: inserted.consumed_spacer,
    })
}

/// Remove the card at `position` of a segment; `None` when out of range
pub fn remove_card_at_slot(
    collection: &mut Collection,
    segment_id: &str,
    position: usize,
) -> PlannerResult<Option<RemovedCard>> {
    let removed = collection.remove_card(segment_id, position)?;
    if let Some(card) = &removed {
        log::info!("Removed '{}' from segment {} at position {}", card.card_id, segment_id, position);
    }
    Ok(removed)
}
