//! Collection aggregate
//!
//! Owns every container, segment, plan and the ownership ledger. Card
//! sequence edits go through here so the segment and the ledger are
//! renumbered together.

use serde::{Deserialize, Serialize};

use super::container::Container;
use super::errors::{PlannerError, PlannerResult};
use super::ownership::OwnershipLedger;
use super::plan::Plan;
use super::segment::{CardInsertion, RemovedCard, Segment};

pub const COLLECTION_SCHEMA_VERSION: &str = "1";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub version: Option<String>,
}

impl CollectionMetadata {
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            created_at: Some(now.clone()),
            modified_at: Some(now),
            version: Some(COLLECTION_SCHEMA_VERSION.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default)]
    pub metadata: CollectionMetadata,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub ownership: OwnershipLedger,
}

/// Fresh random id for a new container, segment or plan
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Fill in a generated id when the caller left it blank
fn ensure_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = new_id();
    }
}

impl Collection {
    pub fn new() -> Self {
        Self {
            metadata: CollectionMetadata::new(),
            ..Default::default()
        }
    }

    /// Record a modification time
    pub fn touch(&mut self) {
        self.metadata.modified_at = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Repair data loaded from storage: validate containers, drop dangling spacers
    pub fn normalize(&mut self) -> PlannerResult<()> {
        for container in &self.containers {
            container.validate()?;
        }
        for segment in &mut self.segments {
            segment.prune_spacers();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn container(&self, id: &str) -> PlannerResult<&Container> {
        self.containers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| PlannerError::ContainerNotFound(id.to_string()))
    }

    pub fn segment(&self, id: &str) -> PlannerResult<&Segment> {
        self.segments
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| PlannerError::SegmentNotFound(id.to_string()))
    }

    pub fn segment_mut(&mut self, id: &str) -> PlannerResult<&mut Segment> {
        self.segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PlannerError::SegmentNotFound(id.to_string()))
    }

    pub fn plan(&self, id: &str) -> PlannerResult<&Plan> {
        self.plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PlannerError::PlanNotFound(id.to_string()))
    }

    pub fn plan_mut(&mut self, id: &str) -> PlannerResult<&mut Plan> {
        self.plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PlannerError::PlanNotFound(id.to_string()))
    }

    /// Engine input for a plan, or for the whole collection when `plan_id` is None
    ///
    /// Ids in the plan that no longer exist are skipped.
    pub fn placement_inputs(&self, plan_id: Option<&str>) -> PlannerResult<(Vec<&Segment>, Vec<&Container>)> {
        match plan_id {
            None => Ok((self.segments.iter().collect(), self.containers.iter().collect())),
            Some(plan_id) => {
                let plan = self.plan(plan_id)?;
                let segments = plan
                    .segment_ids
                    .iter()
                    .filter_map(|id| self.segments.iter().find(|s| &s.id == id))
                    .collect();
                let containers = plan
                    .container_ids
                    .iter()
                    .filter_map(|id| self.containers.iter().find(|c| &c.id == id))
                    .collect();
                Ok((segments, containers))
            }
        }
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    /// Add a container; a blank id is replaced with a generated one
    ///
    /// Returns the id the container was stored under.
    pub fn add_container(&mut self, mut container: Container) -> PlannerResult<String> {
        container.validate()?;
        ensure_id(&mut container.id);
        if self.containers.iter().any(|c| c.id == container.id) {
            return Err(PlannerError::DuplicateId(container.id));
        }
        let id = container.id.clone();
        self.containers.push(container);
        Ok(id)
    }

    /// Replace a container's name and shape
    pub fn update_container(&mut self, container: Container) -> PlannerResult<()> {
        container.validate()?;
        let slot = self
            .containers
            .iter_mut()
            .find(|c| c.id == container.id)
            .ok_or_else(|| PlannerError::ContainerNotFound(container.id.clone()))?;
        *slot = container;
        Ok(())
    }

    /// Delete a container and remove it from every plan
    ///
    /// Segments targeting it keep the id; placement treats it as no target.
    pub fn delete_container(&mut self, id: &str) -> PlannerResult<Container> {
        let index = self
            .containers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| PlannerError::ContainerNotFound(id.to_string()))?;
        for plan in &mut self.plans {
            plan.remove_container(id);
        }
        Ok(self.containers.remove(index))
    }

    // ------------------------------------------------------------------
    // Segments
    // ------------------------------------------------------------------

    /// Add a segment; a blank id is replaced with a generated one
    pub fn add_segment(&mut self, mut segment: Segment) -> PlannerResult<String> {
        ensure_id(&mut segment.id);
        if self.segments.iter().any(|s| s.id == segment.id) {
            return Err(PlannerError::DuplicateId(segment.id));
        }
        segment.prune_spacers();
        let id = segment.id.clone();
        self.segments.push(segment);
        Ok(id)
    }

    /// Delete a segment, its ownership keys and its plan references
    pub fn delete_segment(&mut self, id: &str) -> PlannerResult<Segment> {
        let index = self
            .segments
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| PlannerError::SegmentNotFound(id.to_string()))?;
        self.ownership.remove_segment(id);
        for plan in &mut self.plans {
            plan.remove_segment(id);
        }
        Ok(self.segments.remove(index))
    }

    /// Insert a card into a segment and re-key its ownership flags
    pub fn insert_card(&mut self, segment_id: &str, card_id: &str, before: Option<usize>) -> PlannerResult<CardInsertion> {
        let inserted = self.segment_mut(segment_id)?.insert_card(card_id, before);
        self.ownership.shift_for_insert(segment_id, inserted.position);
        Ok(inserted)
    }

    /// Remove a card from a segment and re-key its ownership flags
    ///
    /// `Ok(None)` when the position is out of range.
    pub fn remove_card(&mut self, segment_id: &str, position: usize) -> PlannerResult<Option<RemovedCard>> {
        let removed = self.segment_mut(segment_id)?.remove_card(position);
        if removed.is_some() {
            self.ownership.shift_for_remove(segment_id, position);
        }
        Ok(removed)
    }

    /// Put a removed card back at its old position (spacers included)
    pub fn restore_card(&mut self, segment_id: &str, position: usize, removed: &RemovedCard) -> PlannerResult<()> {
        self.segment_mut(segment_id)?
            .restore_card(position, removed.card_id.clone(), removed.spacers);
        self.ownership.shift_for_insert(segment_id, position);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------

    /// Add a plan; a blank id is replaced with a generated one
    pub fn add_plan(&mut self, mut plan: Plan) -> PlannerResult<String> {
        ensure_id(&mut plan.id);
        if self.plans.iter().any(|p| p.id == plan.id) {
            return Err(PlannerError::DuplicateId(plan.id));
        }
        let id = plan.id.clone();
        self.plans.push(plan);
        Ok(id)
    }

    /// Replace a plan's name and member lists
    pub fn update_plan(&mut self, plan: Plan) -> PlannerResult<()> {
        let slot = self.plan_mut(&plan.id)?;
        *slot = plan;
        Ok(())
    }

    pub fn delete_plan(&mut self, id: &str) -> PlannerResult<Plan> {
        let index = self
            .plans
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PlannerError::PlanNotFound(id.to_string()))?;
        Ok(self.plans.remove(index))
    }
}
