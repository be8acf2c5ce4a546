//! Ordered string-to-string style map.
//!
//! Declarations keep the order in which keys were first inserted so that
//! rendering an unchanged node never transposes declarations.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key`, replacing an existing value in place (its position is kept).
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `key: value; key: value` in insertion order.
    pub fn to_declarations(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StyleMapVisitor;

        impl<'de> Visitor<'de> for StyleMapVisitor {
            type Value = StyleMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of style keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleMap, A::Error> {
                let mut map = StyleMap::new();
                while let Some((key, value)) = access.next_entry::<String, StyleValue>()? {
                    map.set(key, value.0);
                }
                Ok(map)
            }

            fn visit_unit<E>(self) -> Result<StyleMap, E> {
                Ok(StyleMap::new())
            }
        }

        deserializer.deserialize_any(StyleMapVisitor)
    }
}

/// Style values are opaque strings; numbers from upstream JSON are accepted
/// and stored in their textual form.
struct StyleValue(String);

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(StyleValue(s)),
            serde_json::Value::Number(n) => Ok(StyleValue(n.to_string())),
            serde_json::Value::Bool(b) => Ok(StyleValue(b.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "style values must be strings, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_first_insertion_position() {
        let mut style = StyleMap::new();
        style.set("color", "red");
        style.set("padding", "1rem");
        style.set("color", "blue");
        assert_eq!(style.to_declarations(), "color: blue; padding: 1rem");
    }

    #[test]
    fn test_remove() {
        let mut style: StyleMap = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(style.remove("a").as_deref(), Some("1"));
        assert_eq!(style.remove("a"), None);
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let style: StyleMap =
            serde_json::from_str(r##"{"z-index": "2", "background": "#000", "margin": 0}"##)
                .unwrap();
        let keys: Vec<_> = style.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z-index", "background", "margin"]);
        assert_eq!(style.get("margin"), Some("0"));
    }

    #[test]
    fn test_serialize_preserves_insertion_order() {
        let style: StyleMap = [("width", "10%"), ("color", "red")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&style).unwrap(),
            r#"{"width":"10%","color":"red"}"#
        );
    }

    #[test]
    fn test_null_is_empty_map() {
        let style: StyleMap = serde_json::from_str("null").unwrap();
        assert!(style.is_empty());
    }

    #[test]
    fn test_nested_values_are_rejected() {
        assert!(serde_json::from_str::<StyleMap>(r#"{"a": {"b": 1}}"#).is_err());
    }
}
