//! Owned/skipped tracking keyed by segment position
//!
//! A key is `segmentId:position`. Positions are plain indices into the
//! segment's card sequence, so every insert or removal in a segment must be
//! mirrored here with [`OwnershipLedger::shift_for_insert`] or
//! [`OwnershipLedger::shift_for_remove`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::errors::PlannerError;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnershipKey {
    pub segment_id: String,
    pub position: usize,
}

impl OwnershipKey {
    pub fn new(segment_id: impl Into<String>, position: usize) -> Self {
        Self {
            segment_id: segment_id.into(),
            position,
        }
    }
}

impl fmt::Display for OwnershipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.segment_id, self.position)
    }
}

impl FromStr for OwnershipKey {
    type Err = PlannerError;

    /// Splits on the last ':' so segment ids may contain colons
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (segment_id, position) = s
            .rsplit_once(':')
            .ok_or_else(|| PlannerError::InvalidOwnershipKey(s.to_string()))?;
        if segment_id.is_empty() {
            return Err(PlannerError::InvalidOwnershipKey(s.to_string()));
        }
        let position = position
            .parse::<usize>()
            .map_err(|_| PlannerError::InvalidOwnershipKey(s.to_string()))?;
        Ok(Self::new(segment_id, position))
    }
}

impl Serialize for OwnershipKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OwnershipKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Owned and skipped flags for every card position in a collection
///
/// The two flags are independent; a card may be both owned and skipped.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OwnershipLedger {
    #[serde(default)]
    owned: BTreeSet<OwnershipKey>,
    #[serde(default)]
    skipped: BTreeSet<OwnershipKey>,
}

impl OwnershipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_owned(&self, key: &OwnershipKey) -> bool {
        self.owned.contains(key)
    }

    pub fn is_skipped(&self, key: &OwnershipKey) -> bool {
        self.skipped.contains(key)
    }

    /// Flip the owned flag; returns the new state
    pub fn toggle_owned(&mut self, key: OwnershipKey) -> bool {
        toggle(&mut self.owned, key)
    }

    /// Flip the skipped flag; returns the new state
    pub fn toggle_skipped(&mut self, key: OwnershipKey) -> bool {
        toggle(&mut self.skipped, key)
    }

    pub fn set_owned(&mut self, key: OwnershipKey, owned: bool) {
        set_flag(&mut self.owned, key, owned);
    }

    pub fn set_skipped(&mut self, key: OwnershipKey, skipped: bool) {
        set_flag(&mut self.skipped, key, skipped);
    }

    /// Number of owned positions in one segment
    pub fn owned_count(&self, segment_id: &str) -> usize {
        self.owned.iter().filter(|k| k.segment_id == segment_id).count()
    }

    /// A card was inserted at `position`: keys at or after it move up one
    pub fn shift_for_insert(&mut self, segment_id: &str, position: usize) {
        for set in [&mut self.owned, &mut self.skipped] {
            rekey(set, segment_id, |p| Some(if p >= position { p + 1 } else { p }));
        }
    }

    /// The card at `position` was removed: its key goes, later keys move down one
    pub fn shift_for_remove(&mut self, segment_id: &str, position: usize) {
        for set in [&mut self.owned, &mut self.skipped] {
            rekey(set, segment_id, |p| match p.cmp(&position) {
                std::cmp::Ordering::Less => Some(p),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(p - 1),
            });
        }
    }

    /// Forget every key of a deleted segment
    pub fn remove_segment(&mut self, segment_id: &str) {
        self.owned.retain(|k| k.segment_id != segment_id);
        self.skipped.retain(|k| k.segment_id != segment_id);
    }
}

fn toggle(set: &mut BTreeSet<OwnershipKey>, key: OwnershipKey) -> bool {
    if set.remove(&key) {
        false
    } else {
        set.insert(key);
        true
    }
}

fn set_flag(set: &mut BTreeSet<OwnershipKey>, key: OwnershipKey, on: bool) {
    if on {
        set.insert(key);
    } else {
        set.remove(&key);
    }
}

fn rekey<F>(set: &mut BTreeSet<OwnershipKey>, segment_id: &str, map: F)
where
    F: Fn(usize) -> Option<usize>,
{
    let affected: Vec<OwnershipKey> = set.iter().filter(|k| k.segment_id == segment_id).cloned().collect();
    for key in &affected {
        set.remove(key);
    }
    for key in affected {
        if let Some(position) = map(key.position) {
            set.insert(OwnershipKey::new(key.segment_id, position));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seg: &str, pos: usize) -> OwnershipKey {
        OwnershipKey::new(seg, pos)
    }

    #[test]
    fn test_key_format_and_parse() {
        let k = key("abc", 7);
        assert_eq!(k.to_string(), "abc:7");
        assert_eq!("abc:7".parse::<OwnershipKey>().unwrap(), k);
        assert_eq!("set:2024:3".parse::<OwnershipKey>().unwrap(), key("set:2024", 3));
    }

    #[test]
    fn test_key_parse_errors() {
        assert!("nocolon".parse::<OwnershipKey>().is_err());
        assert!(":3".parse::<OwnershipKey>().is_err());
        assert!("seg:-1".parse::<OwnershipKey>().is_err());
    }

    #[test]
    fn test_owned_and_skipped_are_independent() {
        let mut ledger = OwnershipLedger::new();
        assert!(ledger.toggle_owned(key("s", 0)));
        assert!(ledger.toggle_skipped(key("s", 0)));
        assert!(ledger.is_owned(&key("s", 0)));
        assert!(ledger.is_skipped(&key("s", 0)));

        assert!(!ledger.toggle_owned(key("s", 0)));
        assert!(!ledger.is_owned(&key("s", 0)));
        assert!(ledger.is_skipped(&key("s", 0)));
    }

    #[test]
    fn test_shift_for_insert() {
        let mut ledger = OwnershipLedger::new();
        ledger.set_owned(key("s", 1), true);
        ledger.set_owned(key("s", 3), true);
        ledger.set_skipped(key("s", 3), true);
        ledger.set_owned(key("other", 3), true);

        ledger.shift_for_insert("s", 3);

        assert!(ledger.is_owned(&key("s", 1)));
        assert!(!ledger.is_owned(&key("s", 3)));
        assert!(ledger.is_owned(&key("s", 4)));
        assert!(ledger.is_skipped(&key("s", 4)));
        assert!(ledger.is_owned(&key("other", 3)));
    }

    #[test]
    fn test_shift_for_remove() {
        let mut ledger = OwnershipLedger::new();
        ledger.set_owned(key("s", 0), true);
        ledger.set_owned(key("s", 2), true);
        ledger.set_owned(key("s", 5), true);

        ledger.shift_for_remove("s", 2);

        assert!(ledger.is_owned(&key("s", 0)));
        assert!(!ledger.is_owned(&key("s", 2)));
        assert!(ledger.is_owned(&key("s", 4)));
        assert!(!ledger.is_owned(&key("s", 5)));
        assert_eq!(ledger.owned_count("s"), 2);
    }

    #[test]
    fn test_insert_after_key_leaves_it_alone() {
        let mut ledger = OwnershipLedger::new();
        ledger.toggle_owned(key("s", 2));
        ledger.toggle_skipped(key("s", 2));

        ledger.shift_for_insert("s", 3);

        assert!(ledger.is_owned(&key("s", 2)));
        assert!(ledger.is_skipped(&key("s", 2)));
    }

    #[test]
    fn test_remove_segment_cascade() {
        let mut ledger = OwnershipLedger::new();
        ledger.set_owned(key("gone", 0), true);
        ledger.set_skipped(key("gone", 1), true);
        ledger.set_owned(key("kept", 0), true);

        ledger.remove_segment("gone");

        assert_eq!(ledger.owned_count("gone"), 0);
        assert!(!ledger.is_skipped(&key("gone", 1)));
        assert_eq!(ledger.owned_count("kept"), 1);
    }

    #[test]
    fn test_ledger_serializes_as_key_strings() {
        let mut ledger = OwnershipLedger::new();
        ledger.set_owned(key("s", 1), true);
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"owned":["s:1"],"skipped":[]}"#);

        let back: OwnershipLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
