use crate::models::{Collection, OwnershipKey, PlannerError, PlannerResult, RemovedCard};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Represents a reversible edit to a collection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// A card was inserted into a segment
    #[serde(rename_all = "camelCase")]
    InsertCard {
        segment_id: String,
        position: usize,
        card_id: String,
        /// The card filled one of the blanks recorded at `position`
        consumed_spacer: bool,
    },
    /// A card was removed from a segment
    #[serde(rename_all = "camelCase")]
    RemoveCard {
        segment_id: String,
        position: usize,
        removed: RemovedCard,
        owned: bool,
        skipped: bool,
    },
    #[serde(rename_all = "camelCase")]
    AddSpacer { segment_id: String, position: usize },
    #[serde(rename_all = "camelCase")]
    RemoveSpacer { segment_id: String, position: usize },
    #[serde(rename_all = "camelCase")]
    SetOffset {
        segment_id: String,
        previous: u32,
        offset: u32,
    },
    #[serde(rename_all = "camelCase")]
    SetTarget {
        segment_id: String,
        previous: Option<String>,
        target: Option<String>,
    },
    ToggleOwned { key: OwnershipKey },
    ToggleSkipped { key: OwnershipKey },
}

impl Command {
    /// Execute this command on the collection (used for redo)
    pub fn execute(&self, collection: &mut Collection) -> PlannerResult<()> {
        match self {
            Command::InsertCard { segment_id, position, card_id, .. } => {
                collection.insert_card(segment_id, card_id, Some(*position))?;
            }
            Command::RemoveCard { segment_id, position, .. } => {
                collection.remove_card(segment_id, *position)?;
            }
            Command::AddSpacer { segment_id, position } => {
                collection.segment_mut(segment_id)?.add_spacer(*position);
            }
            Command::RemoveSpacer { segment_id, position } => {
                collection.segment_mut(segment_id)?.remove_spacer(*position);
            }
            Command::SetOffset { segment_id, offset, .. } => {
                collection.segment_mut(segment_id)?.offset = *offset;
            }
            Command::SetTarget { segment_id, target, .. } => {
                collection.segment_mut(segment_id)?.target_container_id = target.clone();
            }
            Command::ToggleOwned { key } => {
                collection.ownership.toggle_owned(key.clone());
            }
            Command::ToggleSkipped { key } => {
                collection.ownership.toggle_skipped(key.clone());
            }
        }
        Ok(())
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, collection: &mut Collection) -> PlannerResult<()> {
        match self {
            Command::InsertCard { segment_id, position, consumed_spacer, .. } => {
                collection.remove_card(segment_id, *position)?;
                if *consumed_spacer {
                    collection.segment_mut(segment_id)?.add_spacer(*position);
                }
            }
            Command::RemoveCard { segment_id, position, removed, owned, skipped } => {
                collection.restore_card(segment_id, *position, removed)?;
                let key = OwnershipKey::new(segment_id.clone(), *position);
                collection.ownership.set_owned(key.clone(), *owned);
                collection.ownership.set_skipped(key, *skipped);
            }
            Command::AddSpacer { segment_id, position } => {
                collection.segment_mut(segment_id)?.remove_spacer(*position);
            }
            Command::RemoveSpacer { segment_id, position } => {
                collection.segment_mut(segment_id)?.add_spacer(*position);
            }
            Command::SetOffset { segment_id, previous, .. } => {
                collection.segment_mut(segment_id)?.offset = *previous;
            }
            Command::SetTarget { segment_id, previous, .. } => {
                collection.segment_mut(segment_id)?.target_container_id = previous.clone();
            }
            Command::ToggleOwned { key } => {
                collection.ownership.toggle_owned(key.clone());
            }
            Command::ToggleSkipped { key } => {
                collection.ownership.toggle_skipped(key.clone());
            }
        }
        Ok(())
    }

    /// Get the segment this command touched
    pub fn affected_segment(&self) -> &str {
        match self {
            Command::InsertCard { segment_id, .. }
            | Command::RemoveCard { segment_id, .. }
            | Command::AddSpacer { segment_id, .. }
            | Command::RemoveSpacer { segment_id, .. }
            | Command::SetOffset { segment_id, .. }
            | Command::SetTarget { segment_id, .. } => segment_id,
            Command::ToggleOwned { key } | Command::ToggleSkipped { key } => &key.segment_id,
        }
    }
}

/// Manages undo/redo command history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    pub commands: VecDeque<Command>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    /// Maximum number of commands to keep in history
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoStack {
    /// Create a new undo stack with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record an already executed command
    ///
    /// Anything that was undone and not redone is discarded.
    pub fn push(&mut self, command: Command) {
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        while self.commands.len() > self.max_size {
            self.commands.pop_front();
        }
        self.current_index = self.commands.len();
    }

    /// Undo the last command
    pub fn undo(&mut self, collection: &mut Collection) -> PlannerResult<Command> {
        if !self.can_undo() {
            return Err(PlannerError::NothingToUndo);
        }
        let command = self.commands[self.current_index - 1].clone();
        command.undo(collection)?;
        self.current_index -= 1;
        Ok(command)
    }

    /// Redo the last undone command
    pub fn redo(&mut self, collection: &mut Collection) -> PlannerResult<Command> {
        if !self.can_redo() {
            return Err(PlannerError::NothingToRedo);
        }
        let command = self.commands[self.current_index].clone();
        command.execute(collection)?;
        self.current_index += 1;
        Ok(command)
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
    }
}
