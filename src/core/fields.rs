//! Layer 1: The field map
//!
//! Entities carry an open set of fields; the backend owns the schema and we
//! mirror it verbatim. Only the completion flag gets a typed accessor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mutable field map of an entity.
///
/// Equality is field-for-field: rollback paths rely on a restored entity
/// comparing equal to its pre-mutation value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Boolean flag accessor. Missing or non-boolean values read as `false`;
    /// the backend treats unset flags the same way.
    pub fn flag(&self, field: &str) -> bool {
        matches!(self.0.get(field), Some(Value::Bool(true)))
    }

    /// Overlay `patch` onto this map, returning the map as it was before.
    pub fn apply(&mut self, patch: &Fields) -> Fields {
        let previous = self.clone();
        for (k, v) in patch.0.iter() {
            self.0.insert(k.clone(), v.clone());
        }
        previous
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn flag_reads_missing_as_false() {
        let f = fields(&[("title", json!("A"))]);
        assert!(!f.flag("isDone"));
        let f = fields(&[("isDone", json!("yes"))]);
        assert!(!f.flag("isDone"));
        let f = fields(&[("isDone", json!(true))]);
        assert!(f.flag("isDone"));
    }

    #[test]
    fn apply_overlays_and_returns_previous() {
        let mut f = fields(&[("title", json!("A")), ("isDone", json!(false))]);
        let before = f.clone();
        let patch = fields(&[("isDone", json!(true)), ("priority", json!(2))]);
        let previous = f.apply(&patch);
        assert_eq!(previous, before);
        assert!(f.flag("isDone"));
        assert_eq!(f.get("priority"), Some(&json!(2)));
        assert_eq!(f.get("title"), Some(&json!("A")));
    }
}
