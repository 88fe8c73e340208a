//! Plans: named workspaces selecting containers and segments

use serde::{Deserialize, Serialize};

/// An ordered selection of containers and segments
///
/// Order matters: container order is the fill order and segment order is the
/// placement order. The same container or segment may appear in many plans.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Blank when created by the host; the collection assigns one
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub container_ids: Vec<String>,
    #[serde(default)]
    pub segment_ids: Vec<String>,
}

impl Plan {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            container_ids: Vec::new(),
            segment_ids: Vec::new(),
        }
    }

    /// Append a container; returns false if it is already in the plan
    pub fn add_container(&mut self, container_id: &str) -> bool {
        push_unique(&mut self.container_ids, container_id)
    }

    /// Append a segment; returns false if it is already in the plan
    pub fn add_segment(&mut self, segment_id: &str) -> bool {
        push_unique(&mut self.segment_ids, segment_id)
    }

    pub fn remove_container(&mut self, container_id: &str) -> bool {
        remove_id(&mut self.container_ids, container_id)
    }

    pub fn remove_segment(&mut self, segment_id: &str) -> bool {
        remove_id(&mut self.segment_ids, segment_id)
    }
}

fn push_unique(ids: &mut Vec<String>, id: &str) -> bool {
    if ids.iter().any(|existing| existing == id) {
        return false;
    }
    ids.push(id.to_string());
    true
}

fn remove_id(ids: &mut Vec<String>, id: &str) -> bool {
    let before = ids.len();
    ids.retain(|existing| existing != id);
    ids.len() != before
}
