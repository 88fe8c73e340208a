//! Slot address conversions
//!
//! These functions convert between linear slot indices and page/slot
//! addresses for a container passed from JavaScript.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, planner_error, serialize, validation_error};
use crate::models::Container;

fn container_from_js(container_js: JsValue) -> Result<Container, JsValue> {
    let container: Container = deserialize(container_js, "Container deserialization error")?;
    container
        .validate()
        .map_err(|e| planner_error("Invalid container", e))?;
    Ok(container)
}

/// Slot capacity of a container (unbounded containers report a large sentinel)
#[wasm_bindgen(js_name = containerCapacity)]
pub fn container_capacity(container_js: JsValue) -> Result<usize, JsValue> {
    Ok(container_from_js(container_js)?.capacity())
}

/// Convert a 0-based linear slot index to `{ page, slot }`
#[wasm_bindgen(js_name = slotIndexToLocation)]
pub fn slot_index_to_location(container_js: JsValue, index: usize) -> Result<JsValue, JsValue> {
    let container = container_from_js(container_js)?;
    if index >= container.capacity() {
        return Err(validation_error(format!(
            "Slot index {} out of bounds (capacity: {})",
            index,
            container.capacity()
        )));
    }
    serialize(&container.slot_index_to_location(index), "SlotLocation serialization error")
}

/// Convert a 1-based page/slot to a linear slot index; undefined if it does not exist
#[wasm_bindgen(js_name = locationToSlotIndex)]
pub fn location_to_slot_index(container_js: JsValue, page: usize, slot: usize) -> Result<Option<usize>, JsValue> {
    Ok(container_from_js(container_js)?.location_to_slot_index(page, slot))
}
