//! Serde helpers for JS-friendly JSON shapes

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Position-keyed maps (spacer maps) as plain JS objects
///
/// Keys are written as decimal strings. On read, both string and numeric keys
/// are accepted and zero counts are discarded so the map stays sparse.
pub mod position_map {
    use super::*;

    pub fn serialize<S>(map: &BTreeMap<usize, u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (position, count) in map {
            out.serialize_entry(&position.to_string(), count)?;
        }
        out.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<usize, u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PositionMapVisitor)
    }

    struct PositionMapVisitor;

    impl<'de> Visitor<'de> for PositionMapVisitor {
        type Value = BTreeMap<usize, u32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map from card position to spacer count")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut map = BTreeMap::new();
            while let Some((PositionKey(position), count)) = access.next_entry::<PositionKey, u32>()? {
                if count > 0 {
                    map.insert(position, count);
                }
            }
            Ok(map)
        }
    }

    struct PositionKey(usize);

    impl<'de> serde::Deserialize<'de> for PositionKey {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(PositionKeyVisitor)
        }
    }

    struct PositionKeyVisitor;

    impl<'de> Visitor<'de> for PositionKeyVisitor {
        type Value = PositionKey;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative card position")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<PositionKey, E> {
            usize::try_from(v)
                .map(PositionKey)
                .map_err(|_| E::custom(format!("position {} too large", v)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<PositionKey, E> {
            usize::try_from(v)
                .map(PositionKey)
                .map_err(|_| E::custom(format!("invalid position {}", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<PositionKey, E> {
            if v >= 0.0 && v.fract() == 0.0 {
                Ok(PositionKey(v as usize))
            } else {
                Err(E::custom(format!("invalid position {}", v)))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<PositionKey, E> {
            v.trim()
                .parse::<usize>()
                .map(PositionKey)
                .map_err(|_| E::custom(format!("invalid position '{}'", v)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Holder {
        #[serde(with = "position_map")]
        spacers: BTreeMap<usize, u32>,
    }

    #[test]
    fn test_position_map_writes_string_keys() {
        let holder = Holder { spacers: BTreeMap::from([(2, 1), (10, 3)]) };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"spacers":{"2":1,"10":3}}"#);
    }

    #[test]
    fn test_position_map_drops_zero_counts() {
        let holder: Holder = serde_json::from_str(r#"{"spacers":{"0":0,"4":2}}"#).unwrap();
        assert_eq!(holder.spacers, BTreeMap::from([(4, 2)]));
    }

    #[test]
    fn test_position_map_rejects_garbage_keys() {
        let result: Result<Holder, _> = serde_json::from_str(r#"{"spacers":{"x":1}}"#);
        assert!(result.is_err());
    }
}
