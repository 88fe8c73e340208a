//! Planner settings
//!
//! Passed from JavaScript as an optional JSON string. Missing fields take
//! their defaults.

use serde::{Deserialize, Serialize};

use super::errors::PlannerResult;

/// Largest offset a segment accepts by default
pub const DEFAULT_MAX_OFFSET: u32 = 9;

/// Number of edits kept for undo by default
pub const DEFAULT_UNDO_HISTORY: usize = 100;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerSettings {
    /// Largest leading-blank offset a segment may request
    pub max_offset: u32,

    /// Maximum number of commands kept in undo history
    pub undo_history_size: usize,

    /// Skip card positions the registered catalog cannot resolve
    pub skip_unresolved_cards: bool,

    /// Log level name ("off", "error", "warn", "info", "debug", "trace")
    pub log_level: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_offset: DEFAULT_MAX_OFFSET,
            undo_history_size: DEFAULT_UNDO_HISTORY,
            skip_unresolved_cards: true,
            log_level: "debug".to_string(),
        }
    }
}

impl PlannerSettings {
    /// Parse settings JSON, or use defaults when none is given
    pub fn from_json(json: Option<&str>) -> PlannerResult<Self> {
        match json {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(json)?),
            _ => Ok(Self::default()),
        }
    }

    /// Level filter for the `log` facade; unknown names fall back to Debug
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::PlannerError;

    #[test]
    fn test_defaults_when_missing() {
        assert_eq!(PlannerSettings::from_json(None).unwrap(), PlannerSettings::default());
        assert_eq!(PlannerSettings::from_json(Some("  ")).unwrap(), PlannerSettings::default());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let settings = PlannerSettings::from_json(Some(r#"{"maxOffset": 4, "logLevel": "warn"}"#)).unwrap();
        assert_eq!(settings.max_offset, 4);
        assert_eq!(settings.undo_history_size, DEFAULT_UNDO_HISTORY);
        assert!(settings.skip_unresolved_cards);
        assert_eq!(settings.level_filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        assert!(matches!(
            PlannerSettings::from_json(Some("{not json")),
            Err(PlannerError::Serialization(_))
        ));
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let settings = PlannerSettings {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.level_filter(), log::LevelFilter::Debug);
    }
}
