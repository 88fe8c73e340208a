//! Container capacity model
//!
//! A container is a binder (pages of 9 or 12 pockets) or a storage box with no
//! practical limit. Slots are addressed either by a 0-based linear index or by
//! a 1-based (page, slot-on-page) pair.

use serde::{Deserialize, Serialize};

use super::errors::{PlannerError, PlannerResult};

/// Capacity reported for unbounded containers
///
/// Larger than any realistic collection while still being a safe JS number.
pub const UNBOUNDED_CAPACITY: usize = 1_000_000;

/// Page number reported for every slot of an unbounded container
pub const UNBOUNDED_PAGE: usize = 1;

/// Pocket layouts that binder pages are sold in
pub const SLOTS_PER_PAGE_OPTIONS: [usize; 2] = [9, 12];

/// Physical shape of a container
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContainerKind {
    /// Binder with a fixed number of pages
    #[serde(rename_all = "camelCase")]
    Bounded {
        page_count: usize,
        slots_per_page: usize,
    },
    /// Storage box, effectively infinite
    Unbounded,
}

/// A slot address as shown to the user
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlotLocation {
    /// 1-based page (constant for unbounded containers)
    pub page: usize,
    /// 1-based slot on the page (linear position for unbounded containers)
    pub slot: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Blank when created by the host; the collection assigns one
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub kind: ContainerKind,
}

impl Container {
    /// Create a binder, validating page count and pocket layout
    pub fn bounded(
        id: impl Into<String>,
        name: impl Into<String>,
        page_count: usize,
        slots_per_page: usize,
    ) -> PlannerResult<Self> {
        let container = Self {
            id: id.into(),
            name: name.into(),
            kind: ContainerKind::Bounded { page_count, slots_per_page },
        };
        container.validate()?;
        Ok(container)
    }

    /// Create a storage box
    pub fn unbounded(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ContainerKind::Unbounded,
        }
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if let ContainerKind::Bounded { page_count, slots_per_page } = self.kind {
            if page_count == 0 {
                return Err(PlannerError::InvalidContainer(format!(
                    "'{}' must have at least one page",
                    self.id
                )));
            }
            if !SLOTS_PER_PAGE_OPTIONS.contains(&slots_per_page) {
                return Err(PlannerError::InvalidContainer(format!(
                    "'{}' has {} slots per page (must be 9 or 12)",
                    self.id, slots_per_page
                )));
            }
        }
        Ok(())
    }

    /// Total number of slots in the container
    pub fn capacity(&self) -> usize {
        match self.kind {
            ContainerKind::Bounded { page_count, slots_per_page } => page_count * slots_per_page,
            ContainerKind::Unbounded => UNBOUNDED_CAPACITY,
        }
    }

    /// Map a linear slot index to its page and slot
    ///
    /// Callers check `index < capacity()` first.
    pub fn slot_index_to_location(&self, index: usize) -> SlotLocation {
        match self.kind {
            ContainerKind::Bounded { slots_per_page, .. } => SlotLocation {
                page: index / slots_per_page + 1,
                slot: index % slots_per_page + 1,
            },
            ContainerKind::Unbounded => SlotLocation {
                page: UNBOUNDED_PAGE,
                slot: index + 1,
            },
        }
    }

    /// Inverse of [`Container::slot_index_to_location`]
    ///
    /// Returns `None` for addresses that do not exist in this container.
    /// Unbounded containers ignore the page number.
    pub fn location_to_slot_index(&self, page: usize, slot: usize) -> Option<usize> {
        if slot == 0 {
            return None;
        }
        match self.kind {
            ContainerKind::Bounded { page_count, slots_per_page } => {
                if page == 0 || page > page_count || slot > slots_per_page {
                    return None;
                }
                Some((page - 1) * slots_per_page + (slot - 1))
            }
            ContainerKind::Unbounded => {
                let index = slot - 1;
                (index < UNBOUNDED_CAPACITY).then_some(index)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_capacity() {
        let binder = Container::bounded("b1", "Binder", 2, 9).unwrap();
        assert_eq!(binder.capacity(), 18);

        let big = Container::bounded("b2", "Big", 20, 12).unwrap();
        assert_eq!(big.capacity(), 240);
    }

    #[test]
    fn test_unbounded_capacity_is_sentinel() {
        let bulk = Container::unbounded("box", "Bulk box");
        assert_eq!(bulk.capacity(), UNBOUNDED_CAPACITY);
        assert_eq!(bulk.kind, ContainerKind::Unbounded);
    }

    #[test]
    fn test_invalid_binders_rejected() {
        assert!(matches!(
            Container::bounded("b", "No pages", 0, 9),
            Err(PlannerError::InvalidContainer(_))
        ));
        assert!(matches!(
            Container::bounded("b", "Odd pockets", 4, 8),
            Err(PlannerError::InvalidContainer(_))
        ));
    }

    #[test]
    fn test_slot_index_to_location_bounded() {
        let binder = Container::bounded("b1", "Binder", 3, 9).unwrap();
        assert_eq!(binder.slot_index_to_location(0), SlotLocation { page: 1, slot: 1 });
        assert_eq!(binder.slot_index_to_location(8), SlotLocation { page: 1, slot: 9 });
        assert_eq!(binder.slot_index_to_location(9), SlotLocation { page: 2, slot: 1 });
        assert_eq!(binder.slot_index_to_location(26), SlotLocation { page: 3, slot: 9 });
    }

    #[test]
    fn test_slot_index_to_location_unbounded() {
        let bulk = Container::unbounded("box", "Bulk box");
        assert_eq!(bulk.slot_index_to_location(0), SlotLocation { page: 1, slot: 1 });
        assert_eq!(bulk.slot_index_to_location(41), SlotLocation { page: 1, slot: 42 });
    }

    #[test]
    fn test_location_to_slot_index_inverse() {
        let binder = Container::bounded("b1", "Binder", 3, 12).unwrap();
        for index in 0..binder.capacity() {
            let loc = binder.slot_index_to_location(index);
            assert_eq!(binder.location_to_slot_index(loc.page, loc.slot), Some(index));
        }
    }

    #[test]
    fn test_location_out_of_range() {
        let binder = Container::bounded("b1", "Binder", 2, 9).unwrap();
        assert_eq!(binder.location_to_slot_index(0, 1), None);
        assert_eq!(binder.location_to_slot_index(1, 0), None);
        assert_eq!(binder.location_to_slot_index(1, 10), None);
        assert_eq!(binder.location_to_slot_index(3, 1), None);

        let bulk = Container::unbounded("box", "Bulk box");
        assert_eq!(bulk.location_to_slot_index(7, 5), Some(4));
    }

    #[test]
    fn test_kind_serializes_tagged() {
        let binder = Container::bounded("b1", "Binder", 2, 9).unwrap();
        let json = serde_json::to_value(&binder).unwrap();
        assert_eq!(json["kind"]["type"], "bounded");
        assert_eq!(json["kind"]["pageCount"], 2);
        assert_eq!(json["kind"]["slotsPerPage"], 9);

        let bulk: Container =
            serde_json::from_str(r#"{"id":"x","name":"Box","kind":{"type":"unbounded"}}"#).unwrap();
        assert_eq!(bulk.kind, ContainerKind::Unbounded);
    }
}
