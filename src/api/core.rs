//! Store-backed WASM API
//!
//! The planner store lives in WASM memory and is the canonical source of
//! truth. Every mutating call locks it, applies one edit, lets the store
//! recompute placement and returns the fresh snapshot. The host persists
//! the collection by reading `getCollectionSnapshot` after each edit.

use wasm_bindgen::prelude::*;
use std::sync::{Mutex, MutexGuard};
use lazy_static::lazy_static;

use crate::api::helpers::{deserialize, planner_error, serialize, validation_error};
use crate::api::types::{EditResult, ToggleResult};
use crate::models::{CardRecord, Collection, Container, OwnershipKey, Plan, PlannerSettings, Segment};
use crate::store::{collection_from_json, collection_to_json, PlannerStore};
use crate::{wasm_info, wasm_log, wasm_warn};

// WASM-owned planner storage
lazy_static! {
    static ref STORE: Mutex<PlannerStore> = Mutex::new(PlannerStore::default());
}

fn lock_store() -> Result<MutexGuard<'static, PlannerStore>, JsValue> {
    STORE
        .lock()
        .map_err(|e| validation_error(format!("Planner store lock poisoned: {}", e)))
}

fn edit_result(store: &PlannerStore, changed: bool, started: f64) -> Result<JsValue, JsValue> {
    wasm_log!(
        "  Recomputed: {} placed, {} overflow ({:.1} ms)",
        store.placement().placements.len(),
        store.placement().overflow_count(),
        js_sys::Date::now() - started
    );
    serialize(&EditResult::from_store(store, changed), "EditResult serialization error")
}

fn created_result(store: &PlannerStore, id: String, started: f64) -> Result<JsValue, JsValue> {
    wasm_log!("  Created {} ({:.1} ms)", id, js_sys::Date::now() - started);
    let result = EditResult::from_store(store, true).with_created_id(id);
    serialize(&result, "EditResult serialization error")
}

// ============================================================================
// Configuration and loading
// ============================================================================

/// Apply planner settings from an optional JSON string
#[wasm_bindgen(js_name = configure)]
pub fn configure(settings_json: Option<String>) -> Result<(), JsValue> {
    wasm_info!("configure called");

    let settings = PlannerSettings::from_json(settings_json.as_deref())
        .map_err(|e| planner_error("Settings parse error", e))?;
    lock_store()?.configure(settings);
    Ok(())
}

/// Load a collection object from JavaScript into WASM's internal storage
#[wasm_bindgen(js_name = loadCollection)]
pub fn load_collection(collection_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("loadCollection called");
    let started = js_sys::Date::now();

    let collection: Collection = deserialize(collection_js, "Collection deserialization error")?;
    let mut store = lock_store()?;
    store
        .replace_collection(collection)
        .map_err(|e| planner_error("Collection rejected", e))?;

    wasm_info!(
        "  Loaded {} container(s), {} segment(s), {} plan(s)",
        store.collection().containers.len(),
        store.collection().segments.len(),
        store.collection().plans.len()
    );
    edit_result(&store, true, started)
}

/// Load a collection from its JSON text (as kept in browser storage)
#[wasm_bindgen(js_name = importCollectionJson)]
pub fn import_collection_json(json: String) -> Result<JsValue, JsValue> {
    wasm_info!("importCollectionJson called ({} bytes)", json.len());
    let started = js_sys::Date::now();

    let collection = collection_from_json(&json).map_err(|e| planner_error("Collection import error", e))?;
    let mut store = lock_store()?;
    store
        .replace_collection(collection)
        .map_err(|e| planner_error("Collection rejected", e))?;
    edit_result(&store, true, started)
}

/// Current collection as a JavaScript object
#[wasm_bindgen(js_name = getCollectionSnapshot)]
pub fn get_collection_snapshot() -> Result<JsValue, JsValue> {
    let store = lock_store()?;
    serialize(store.collection(), "Collection serialization error")
}

/// Current collection as JSON text for browser storage
#[wasm_bindgen(js_name = exportCollectionJson)]
pub fn export_collection_json() -> Result<String, JsValue> {
    let store = lock_store()?;
    collection_to_json(store.collection()).map_err(|e| planner_error("Collection export error", e))
}

/// Register card records fetched by the host; returns how many were new
#[wasm_bindgen(js_name = registerCards)]
pub fn register_cards(cards_js: JsValue) -> Result<usize, JsValue> {
    let cards: Vec<CardRecord> = deserialize(cards_js, "Card records deserialization error")?;
    wasm_info!("registerCards called with {} record(s)", cards.len());
    Ok(lock_store()?.register_cards(cards))
}

// ============================================================================
// Placement
// ============================================================================

/// Stateless placement over the given segments and containers
#[wasm_bindgen(js_name = computePlacement)]
pub fn compute_placement(segments_js: JsValue, containers_js: JsValue) -> Result<JsValue, JsValue> {
    let segments: Vec<Segment> = deserialize(segments_js, "Segments deserialization error")?;
    let containers: Vec<Container> = deserialize(containers_js, "Containers deserialization error")?;
    wasm_info!(
        "computePlacement called: {} segment(s), {} container(s)",
        segments.len(),
        containers.len()
    );

    for container in &containers {
        container.validate().map_err(|e| planner_error("Invalid container", e))?;
    }
    let result = crate::placement::place(&segments, &containers);
    if result.has_overflow() {
        wasm_warn!("  {} card(s) overflowed", result.overflow_count());
    }
    serialize(&result, "PlacementResult serialization error")
}

/// Select the plan to place, or the whole collection when `planId` is null
#[wasm_bindgen(js_name = setActivePlan)]
pub fn set_active_plan(plan_id: Option<String>) -> Result<JsValue, JsValue> {
    wasm_info!("setActivePlan called: {:?}", plan_id);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store
        .set_active_plan(plan_id)
        .map_err(|e| planner_error("setActivePlan failed", e))?;
    edit_result(&store, true, started)
}

/// Latest placement snapshot
#[wasm_bindgen(js_name = getPlacement)]
pub fn get_placement() -> Result<JsValue, JsValue> {
    let store = lock_store()?;
    serialize(&store.snapshot(), "PlacementSnapshot serialization error")
}

// ============================================================================
// Position edits
// ============================================================================

/// Insert a new card at a page/slot of a container
#[wasm_bindgen(js_name = insertCardAtSlot)]
pub fn insert_card_at_slot(
    container_id: String,
    page: usize,
    slot: usize,
    card_id: String,
) -> Result<JsValue, JsValue> {
    wasm_info!(
        "insertCardAtSlot called: container={}, page={}, slot={}, card={}",
        container_id, page, slot, card_id
    );
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let outcome = store
        .insert_card_at_slot(&container_id, page, slot, &card_id)
        .map_err(|e| planner_error("insertCardAtSlot failed", e))?;
    if !outcome.is_inserted() {
        wasm_warn!("  Insert ignored: {:?}", outcome);
    }

    let result = EditResult::from_store(&store, outcome.is_inserted()).with_outcome(outcome);
    wasm_log!("  Done in {:.1} ms", js_sys::Date::now() - started);
    serialize(&result, "EditResult serialization error")
}

/// Remove the card at a segment position
#[wasm_bindgen(js_name = removeCardAtSlot)]
pub fn remove_card_at_slot(segment_id: String, position: usize) -> Result<JsValue, JsValue> {
    wasm_info!("removeCardAtSlot called: segment={}, position={}", segment_id, position);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let changed = store
        .remove_card_at_slot(&segment_id, position)
        .map_err(|e| planner_error("removeCardAtSlot failed", e))?;
    edit_result(&store, changed, started)
}

// ============================================================================
// Segment settings
// ============================================================================

#[wasm_bindgen(js_name = addSpacer)]
pub fn add_spacer(segment_id: String, position: usize) -> Result<JsValue, JsValue> {
    wasm_info!("addSpacer called: segment={}, position={}", segment_id, position);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let changed = store
        .add_spacer(&segment_id, position)
        .map_err(|e| planner_error("addSpacer failed", e))?;
    edit_result(&store, changed, started)
}

#[wasm_bindgen(js_name = removeSpacer)]
pub fn remove_spacer(segment_id: String, position: usize) -> Result<JsValue, JsValue> {
    wasm_info!("removeSpacer called: segment={}, position={}", segment_id, position);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let changed = store
        .remove_spacer(&segment_id, position)
        .map_err(|e| planner_error("removeSpacer failed", e))?;
    edit_result(&store, changed, started)
}

#[wasm_bindgen(js_name = setSegmentOffset)]
pub fn set_segment_offset(segment_id: String, offset: u32) -> Result<JsValue, JsValue> {
    wasm_info!("setSegmentOffset called: segment={}, offset={}", segment_id, offset);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store
        .set_segment_offset(&segment_id, offset)
        .map_err(|e| planner_error("setSegmentOffset failed", e))?;
    edit_result(&store, true, started)
}

/// Pin a segment to a container; pass null to clear
#[wasm_bindgen(js_name = setSegmentTarget)]
pub fn set_segment_target(segment_id: String, container_id: Option<String>) -> Result<JsValue, JsValue> {
    wasm_info!("setSegmentTarget called: segment={}, target={:?}", segment_id, container_id);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store
        .set_segment_target(&segment_id, container_id)
        .map_err(|e| planner_error("setSegmentTarget failed", e))?;
    edit_result(&store, true, started)
}

// ============================================================================
// Ownership
// ============================================================================

fn toggle(key: &str, skipped: bool) -> Result<JsValue, JsValue> {
    let parsed: OwnershipKey = key
        .parse()
        .map_err(|e| planner_error("Invalid key", e))?;

    let mut store = lock_store()?;
    let toggled = if skipped {
        store.toggle_skipped(parsed)
    } else {
        store.toggle_owned(parsed)
    };
    let value = toggled.map_err(|e| planner_error("Toggle failed", e))?;

    let result = ToggleResult {
        key: key.to_string(),
        value,
        owned_cards: store.snapshot().owned_cards,
    };
    serialize(&result, "ToggleResult serialization error")
}

/// Flip the owned flag of `segmentId:position`
#[wasm_bindgen(js_name = toggleOwned)]
pub fn toggle_owned(key: String) -> Result<JsValue, JsValue> {
    wasm_info!("toggleOwned called: {}", key);
    toggle(&key, false)
}

/// Flip the skipped flag of `segmentId:position`
#[wasm_bindgen(js_name = toggleSkipped)]
pub fn toggle_skipped(key: String) -> Result<JsValue, JsValue> {
    wasm_info!("toggleSkipped called: {}", key);
    toggle(&key, true)
}

// ============================================================================
// Structure edits
// ============================================================================

#[wasm_bindgen(js_name = addContainer)]
pub fn add_container(container_js: JsValue) -> Result<JsValue, JsValue> {
    let container: Container = deserialize(container_js, "Container deserialization error")?;
    wasm_info!("addContainer called: {}", container.name);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let id = store
        .add_container(container)
        .map_err(|e| planner_error("addContainer failed", e))?;
    created_result(&store, id, started)
}

#[wasm_bindgen(js_name = updateContainer)]
pub fn update_container(container_js: JsValue) -> Result<JsValue, JsValue> {
    let container: Container = deserialize(container_js, "Container deserialization error")?;
    wasm_info!("updateContainer called: {}", container.id);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store
        .update_container(container)
        .map_err(|e| planner_error("updateContainer failed", e))?;
    edit_result(&store, true, started)
}

#[wasm_bindgen(js_name = deleteContainer)]
pub fn delete_container(container_id: String) -> Result<JsValue, JsValue> {
    wasm_info!("deleteContainer called: {}", container_id);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store
        .delete_container(&container_id)
        .map_err(|e| planner_error("deleteContainer failed", e))?;
    edit_result(&store, true, started)
}

#[wasm_bindgen(js_name = addSegment)]
pub fn add_segment(segment_js: JsValue) -> Result<JsValue, JsValue> {
    let segment: Segment = deserialize(segment_js, "Segment deserialization error")?;
    wasm_info!("addSegment called: {} ({} cards)", segment.name, segment.len());
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let id = store
        .add_segment(segment)
        .map_err(|e| planner_error("addSegment failed", e))?;
    created_result(&store, id, started)
}

#[wasm_bindgen(js_name = deleteSegment)]
pub fn delete_segment(segment_id: String) -> Result<JsValue, JsValue> {
    wasm_info!("deleteSegment called: {}", segment_id);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store
        .delete_segment(&segment_id)
        .map_err(|e| planner_error("deleteSegment failed", e))?;
    edit_result(&store, true, started)
}

#[wasm_bindgen(js_name = addPlan)]
pub fn add_plan(plan_js: JsValue) -> Result<JsValue, JsValue> {
    let plan: Plan = deserialize(plan_js, "Plan deserialization error")?;
    wasm_info!("addPlan called: {}", plan.name);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let id = store.add_plan(plan).map_err(|e| planner_error("addPlan failed", e))?;
    created_result(&store, id, started)
}

#[wasm_bindgen(js_name = updatePlan)]
pub fn update_plan(plan_js: JsValue) -> Result<JsValue, JsValue> {
    let plan: Plan = deserialize(plan_js, "Plan deserialization error")?;
    wasm_info!("updatePlan called: {}", plan.id);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store.update_plan(plan).map_err(|e| planner_error("updatePlan failed", e))?;
    edit_result(&store, true, started)
}

#[wasm_bindgen(js_name = deletePlan)]
pub fn delete_plan(plan_id: String) -> Result<JsValue, JsValue> {
    wasm_info!("deletePlan called: {}", plan_id);
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    store
        .delete_plan(&plan_id)
        .map_err(|e| planner_error("deletePlan failed", e))?;
    edit_result(&store, true, started)
}

// ============================================================================
// Undo/Redo operations
// ============================================================================

/// Undo the last edit operation
#[wasm_bindgen(js_name = undo)]
pub fn undo() -> Result<JsValue, JsValue> {
    wasm_info!("undo called");
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let command = store.undo().map_err(|e| planner_error("undo failed", e))?;
    wasm_log!("  Undid {:?} on segment {}", command, command.affected_segment());
    edit_result(&store, true, started)
}

/// Redo the last undone edit operation
#[wasm_bindgen(js_name = redo)]
pub fn redo() -> Result<JsValue, JsValue> {
    wasm_info!("redo called");
    let started = js_sys::Date::now();

    let mut store = lock_store()?;
    let command = store.redo().map_err(|e| planner_error("redo failed", e))?;
    wasm_log!("  Redid {:?} on segment {}", command, command.affected_segment());
    edit_result(&store, true, started)
}

/// Check if undo is available
#[wasm_bindgen(js_name = canUndo)]
pub fn can_undo() -> Result<bool, JsValue> {
    Ok(lock_store()?.can_undo())
}

/// Check if redo is available
#[wasm_bindgen(js_name = canRedo)]
pub fn can_redo() -> Result<bool, JsValue> {
    Ok(lock_store()?.can_redo())
}
