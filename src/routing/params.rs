//! Captured path parameters.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// A single typed capture value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(u64),
    Str(String),
    Uuid(Uuid),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Str(v) => f.write_str(v),
            Self::Uuid(v) => write!(f, "{}", v.hyphenated()),
        }
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Uuid> for ParamValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

/// Ordered set of named capture values.
///
/// Produced by resolution and consumed by reverse lookup. Names are unique;
/// inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Integer capture by name; `None` if absent or not an `int` capture.
    pub fn get_int(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(ParamValue::as_int)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, name: String, value: ParamValue) {
        self.entries.push((name, value));
    }

    pub(crate) fn pop(&mut self) {
        self.entries.pop();
    }
}

impl Serialize for Params {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = Params::new().with("id", 1u64).with("slug", "acme");
        params.insert("id", 2u64);

        assert_eq!(params.len(), 2);
        assert_eq!(params.get_int("id"), Some(2));
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["id", "slug"]);
    }

    #[test]
    fn test_get_int_rejects_strings() {
        let params = Params::new().with("id", "42");
        assert_eq!(params.get_int("id"), None);
        assert_eq!(params.get("id").map(ToString::to_string), Some("42".to_string()));
    }

    #[test]
    fn test_serialize_as_map() {
        let params = Params::new().with("id", 7u64).with("name", "acme");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "name": "acme" }));
    }
}
