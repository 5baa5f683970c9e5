//! Layer 3: Filters and sort keys
//!
//! ListFilter doubles as the server-side query (translated to query params)
//! and the client-side predicate for derived views. SortKey orders by an
//! arbitrary field with a total order over JSON values.

use std::cmp::Ordering;

use serde_json::Value;

use super::entity::Entity;

/// Filter over a collection: completion flag plus free-form query params.
///
/// The free-form params are only meaningful server-side; client-side
/// projection applies the `done` predicate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListFilter {
    pub done: Option<bool>,
    pub params: Vec<(String, String)>,
}

impl ListFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Client-side predicate.
    pub fn matches(&self, entity: &Entity, done_field: &str) -> bool {
        match self.done {
            Some(want) => entity.is_done(done_field) == want,
            None => true,
        }
    }

    /// Query pairs for the list request.
    pub fn query_pairs(&self, done_field: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len() + 1);
        if let Some(done) = self.done {
            pairs.push((done_field.to_string(), done.to_string()));
        }
        pairs.extend(self.params.iter().cloned());
        pairs
    }
}

/// Sort by a named field, ascending or descending.
#[derive(Clone, Debug, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }

    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        match (a.fields.get(&self.field), b.fields.get(&self.field)) {
            (None, None) => Ordering::Equal,
            // Missing sorts last regardless of direction.
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = order_values(a, b);
                if self.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    }
}

/// Total order over JSON values: numbers, then strings, then bools.
fn order_values(a: &Value, b: &Value) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| same_rank_cmp(a, b))
}

fn rank(v: &Value) -> u8 {
    match v {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        _ => 3,
    }
}

fn same_rank_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
