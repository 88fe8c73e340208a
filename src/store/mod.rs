//! Planner store
//!
//! Owns the collection and everything derived from it. Each mutating method
//! applies one edit, records it for undo, recomputes placement to completion
//! and saves through the attached persistence adapter before returning, so
//! callers always observe a consistent result.

pub mod persistence;
pub mod view;

pub use persistence::*;
pub use view::*;

use crate::models::{
    CardCatalog, CardLookup, CardRecord, Collection, Container, OwnershipKey, Plan, PlannerError,
    PlannerResult, PlannerSettings, Segment,
};
use crate::placement::{self, InsertOutcome, PlacementResult};
use crate::undo::{Command, UndoStack};

pub struct PlannerStore {
    collection: Collection,
    settings: PlannerSettings,
    active_plan: Option<String>,
    catalog: Option<CardCatalog>,
    placement: PlacementResult,
    history: UndoStack,
    persistence: Option<Box<dyn Persistence>>,
}

impl Default for PlannerStore {
    fn default() -> Self {
        Self::new(PlannerSettings::default())
    }
}

impl PlannerStore {
    pub fn new(settings: PlannerSettings) -> Self {
        let mut store = Self {
            collection: Collection::new(),
            history: UndoStack::new(settings.undo_history_size),
            settings,
            active_plan: None,
            catalog: None,
            placement: PlacementResult::default(),
            persistence: None,
        };
        store.recompute();
        store
    }

    /// Build a store from a collection, repairing it first
    pub fn with_collection(mut collection: Collection, settings: PlannerSettings) -> PlannerResult<Self> {
        collection.normalize()?;
        let mut store = Self::new(settings);
        store.collection = collection;
        store.recompute();
        Ok(store)
    }

    /// Load through an adapter and keep saving through it
    pub fn open(persistence: Box<dyn Persistence>, settings: PlannerSettings) -> PlannerResult<Self> {
        let collection = persistence.load()?;
        let mut store = Self::with_collection(collection, settings)?;
        store.persistence = Some(persistence);
        Ok(store)
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn placement(&self) -> &PlacementResult {
        &self.placement
    }

    pub fn active_plan(&self) -> Option<&str> {
        self.active_plan.as_deref()
    }

    pub fn snapshot(&self) -> PlacementSnapshot {
        let lookup = self.catalog.as_ref().map(|c| c as &dyn CardLookup);
        PlacementSnapshot::build(&self.placement, &self.collection, lookup)
    }

    /// Apply new settings; undo history restarts with the new size
    pub fn configure(&mut self, settings: PlannerSettings) {
        log::set_max_level(settings.level_filter());
        if settings.undo_history_size != self.settings.undo_history_size {
            self.history = UndoStack::new(settings.undo_history_size);
        }
        self.settings = settings;
        self.recompute();
    }

    /// Swap in a collection loaded by the host; history is cleared
    pub fn replace_collection(&mut self, mut collection: Collection) -> PlannerResult<()> {
        collection.normalize()?;
        if let Some(plan_id) = &self.active_plan {
            if collection.plan(plan_id).is_err() {
                log::warn!("Active plan {} missing from loaded collection", plan_id);
                self.active_plan = None;
            }
        }
        self.collection = collection;
        self.history.clear();
        self.recompute();
        Ok(())
    }

    /// Restrict placement to one plan, or use the whole collection with `None`
    pub fn set_active_plan(&mut self, plan_id: Option<String>) -> PlannerResult<()> {
        if let Some(id) = &plan_id {
            self.collection.plan(id)?;
        }
        self.active_plan = plan_id;
        self.recompute();
        Ok(())
    }

    /// Register resolved card records; from now on unresolved ids are skipped
    pub fn register_cards(&mut self, records: Vec<CardRecord>) -> usize {
        let catalog = self.catalog.get_or_insert_with(CardCatalog::new);
        let added = catalog.register(records);
        log::debug!("Registered {} new card record(s), {} known", added, catalog.len());
        self.recompute();
        added
    }

    /// Re-run placement over the active plan
    pub fn recompute(&mut self) {
        let lookup: Option<&dyn CardLookup> = if self.settings.skip_unresolved_cards {
            self.catalog
                .as_ref()
                .filter(|c| !c.is_empty())
                .map(|c| c as &dyn CardLookup)
        } else {
            None
        };

        self.placement = match self.collection.placement_inputs(self.active_plan.as_deref()) {
            Ok((segments, containers)) => placement::compute_placement(&segments, &containers, lookup),
            Err(e) => {
                log::error!("Placement skipped: {}", e);
                PlacementResult::default()
            }
        };
    }

    /// Finish a mutation: stamp, recompute, save
    ///
    /// When the save fails, `revert` takes the edit back out and the error is
    /// returned with the store in its pre-edit state.
    fn commit<F>(&mut self, revert: F) -> PlannerResult<()>
    where
        F: FnOnce(&mut Self) -> PlannerResult<()>,
    {
        let metadata = self.collection.metadata.clone();
        self.collection.touch();
        self.recompute();

        let saved = match &self.persistence {
            Some(persistence) => persistence.save(&self.collection),
            None => Ok(()),
        };
        if let Err(e) = saved {
            log::error!("Save failed, edit reverted: {}", e);
            revert(self)?;
            self.collection.metadata = metadata;
            self.recompute();
            return Err(e);
        }
        Ok(())
    }

    /// Commit an edit that replaces the collection wholesale on failure
    fn commit_restoring(&mut self, backup: Collection) -> PlannerResult<()> {
        self.commit(move |store| {
            store.collection = backup;
            Ok(())
        })
    }

    /// Commit an already applied command and add it to history
    fn record(&mut self, command: Command) -> PlannerResult<()> {
        self.commit(|store| command.undo(&mut store.collection))?;
        self.history.push(command);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Position edits
    // ------------------------------------------------------------------

    pub fn insert_card_at_slot(
        &mut self,
        container_id: &str,
        page: usize,
        slot: usize,
        card_id: &str,
    ) -> PlannerResult<InsertOutcome> {
        let outcome = placement::insert_card_at_slot(
            &mut self.collection,
            &self.placement,
            container_id,
            page,
            slot,
            card_id,
        )?;

        if let InsertOutcome::Inserted { segment_id, position, consumed_spacer } = &outcome {
            self.record(Command::InsertCard {
                segment_id: segment_id.clone(),
                position: *position,
                card_id: card_id.to_string(),
                consumed_spacer: *consumed_spacer,
            })?;
        }
        Ok(outcome)
    }

    /// Returns false when the position is out of range
    pub fn remove_card_at_slot(&mut self, segment_id: &str, position: usize) -> PlannerResult<bool> {
        let key = OwnershipKey::new(segment_id, position);
        let owned = self.collection.ownership.is_owned(&key);
        let skipped = self.collection.ownership.is_skipped(&key);

        match placement::remove_card_at_slot(&mut self.collection, segment_id, position)? {
            Some(removed) => {
                self.record(Command::RemoveCard {
                    segment_id: segment_id.to_string(),
                    position,
                    removed,
                    owned,
                    skipped,
                })?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ------------------------------------------------------------------
    // Segment settings
    // ------------------------------------------------------------------

    pub fn add_spacer(&mut self, segment_id: &str, position: usize) -> PlannerResult<bool> {
        if !self.collection.segment_mut(segment_id)?.add_spacer(position) {
            return Ok(false);
        }
        self.record(Command::AddSpacer {
            segment_id: segment_id.to_string(),
            position,
        })?;
        Ok(true)
    }

    pub fn remove_spacer(&mut self, segment_id: &str, position: usize) -> PlannerResult<bool> {
        if !self.collection.segment_mut(segment_id)?.remove_spacer(position) {
            return Ok(false);
        }
        self.record(Command::RemoveSpacer {
            segment_id: segment_id.to_string(),
            position,
        })?;
        Ok(true)
    }

    pub fn set_segment_offset(&mut self, segment_id: &str, offset: u32) -> PlannerResult<()> {
        let max = self.settings.max_offset;
        if offset > max {
            return Err(PlannerError::OffsetOutOfRange { offset, max });
        }
        let segment = self.collection.segment_mut(segment_id)?;
        let previous = segment.offset;
        if previous == offset {
            return Ok(());
        }
        segment.offset = offset;
        self.record(Command::SetOffset {
            segment_id: segment_id.to_string(),
            previous,
            offset,
        })
    }

    /// Pin a segment to a container, or clear the pin with `None`
    pub fn set_segment_target(&mut self, segment_id: &str, target: Option<String>) -> PlannerResult<()> {
        if let Some(container_id) = &target {
            self.collection.container(container_id)?;
        }
        let segment = self.collection.segment_mut(segment_id)?;
        if segment.target_container_id == target {
            return Ok(());
        }
        let previous = std::mem::replace(&mut segment.target_container_id, target.clone());
        self.record(Command::SetTarget {
            segment_id: segment_id.to_string(),
            previous,
            target,
        })
    }

    // ------------------------------------------------------------------
    // Ownership
    // ------------------------------------------------------------------

    /// Flip the owned flag; returns the new state
    pub fn toggle_owned(&mut self, key: OwnershipKey) -> PlannerResult<bool> {
        self.collection.segment(&key.segment_id)?;
        let owned = self.collection.ownership.toggle_owned(key.clone());
        self.record(Command::ToggleOwned { key })?;
        Ok(owned)
    }

    /// Flip the skipped flag; returns the new state
    pub fn toggle_skipped(&mut self, key: OwnershipKey) -> PlannerResult<bool> {
        self.collection.segment(&key.segment_id)?;
        let skipped = self.collection.ownership.toggle_skipped(key.clone());
        self.record(Command::ToggleSkipped { key })?;
        Ok(skipped)
    }

    // ------------------------------------------------------------------
    // Undo/redo
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> PlannerResult<Command> {
        let command = self.history.undo(&mut self.collection)?;
        self.commit(|store| store.history.redo(&mut store.collection).map(|_| ()))?;
        Ok(command)
    }

    pub fn redo(&mut self) -> PlannerResult<Command> {
        let command = self.history.redo(&mut self.collection)?;
        self.commit(|store| store.history.undo(&mut store.collection).map(|_| ()))?;
        Ok(command)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Structure edits (not undoable)
    // ------------------------------------------------------------------

    /// Returns the container id, generated when the given one was blank
    pub fn add_container(&mut self, container: Container) -> PlannerResult<String> {
        let backup = self.collection.clone();
        let id = self.collection.add_container(container)?;
        self.commit_restoring(backup)?;
        Ok(id)
    }

    pub fn update_container(&mut self, container: Container) -> PlannerResult<()> {
        let backup = self.collection.clone();
        self.collection.update_container(container)?;
        self.commit_restoring(backup)
    }

    pub fn delete_container(&mut self, container_id: &str) -> PlannerResult<Container> {
        let backup = self.collection.clone();
        let removed = self.collection.delete_container(container_id)?;
        self.commit_restoring(backup)?;
        Ok(removed)
    }

    /// Returns the segment id, generated when the given one was blank
    pub fn add_segment(&mut self, segment: Segment) -> PlannerResult<String> {
        let backup = self.collection.clone();
        let id = self.collection.add_segment(segment)?;
        self.commit_restoring(backup)?;
        Ok(id)
    }

    /// Deleting a segment also drops undo history that refers to it
    pub fn delete_segment(&mut self, segment_id: &str) -> PlannerResult<Segment> {
        let backup = self.collection.clone();
        let removed = self.collection.delete_segment(segment_id)?;
        self.commit_restoring(backup)?;
        self.history.clear();
        Ok(removed)
    }

    /// Returns the plan id, generated when the given one was blank
    pub fn add_plan(&mut self, plan: Plan) -> PlannerResult<String> {
        let backup = self.collection.clone();
        let id = self.collection.add_plan(plan)?;
        self.commit_restoring(backup)?;
        Ok(id)
    }

    pub fn update_plan(&mut self, plan: Plan) -> PlannerResult<()> {
        let backup = self.collection.clone();
        self.collection.update_plan(plan)?;
        self.commit_restoring(backup)
    }

    pub fn delete_plan(&mut self, plan_id: &str) -> PlannerResult<Plan> {
        let backup = self.collection.clone();
        let removed = self.collection.delete_plan(plan_id)?;
        let active = self.active_plan.clone();
        if active.as_deref() == Some(plan_id) {
            self.active_plan = None;
        }
        self.commit(move |store| {
            store.collection = backup;
            store.active_plan = active;
            Ok(())
        })?;
        Ok(removed)
    }
}
