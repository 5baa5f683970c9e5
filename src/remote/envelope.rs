//! Response envelope normalization.
//!
//! The backend's envelope shape is inconsistent across endpoints: entities
//! arrive as `{data: entity}` or bare, lists as
//! `{data: {items, total, page, pageSize}}` or a bare array. Everything is
//! normalized here, once - call sites never peel envelopes themselves.

use serde::Deserialize;
use serde_json::Value;

use crate::core::{Entity, Stats};

use super::error::RemoteError;

/// Normalized list response.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub items: Vec<Entity>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageWire {
    items: Vec<Value>,
    total: Option<u64>,
    page: Option<u32>,
    page_size: Option<u32>,
}

/// Strip up to two `{data: ...}` layers.
fn peel(value: Value) -> Value {
    let mut value = value;
    for _ in 0..2 {
        match value {
            Value::Object(ref mut map) if map.contains_key("data") => {
                let inner = map.remove("data").unwrap_or(Value::Null);
                value = inner;
            }
            _ => break,
        }
    }
    value
}

pub fn unwrap_entity(value: Value) -> Result<Entity, RemoteError> {
    match peel(value) {
        Value::Object(map) => Entity::from_object(map).map_err(|e| RemoteError::Shape {
            reason: e.to_string(),
        }),
        other => Err(RemoteError::Shape {
            reason: format!("expected entity object, got {other}"),
        }),
    }
}

pub fn unwrap_list(value: Value) -> Result<Page, RemoteError> {
    match peel(value) {
        Value::Array(items) => {
            let items = decode_items(items)?;
            let total = items.len() as u64;
            let page_size = items.len() as u32;
            Ok(Page {
                items,
                total,
                page: 1,
                page_size,
            })
        }
        object @ Value::Object(_) => {
            let wire: PageWire =
                serde_json::from_value(object).map_err(|e| RemoteError::Shape {
                    reason: format!("list envelope: {e}"),
                })?;
            let items = decode_items(wire.items)?;
            let total = wire.total.unwrap_or(items.len() as u64);
            let page_size = wire.page_size.unwrap_or(items.len() as u32);
            Ok(Page {
                items,
                total,
                page: wire.page.unwrap_or(1),
                page_size,
            })
        }
        other => Err(RemoteError::Shape {
            reason: format!("expected list, got {other}"),
        }),
    }
}

pub fn unwrap_stats(value: Value) -> Result<Stats, RemoteError> {
    serde_json::from_value(peel(value)).map_err(|e| RemoteError::Shape {
        reason: format!("stats envelope: {e}"),
    })
}

/// Best-effort extraction of the server's error message from a non-2xx body.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    message_in(&value).or_else(|| message_in(&peel(value)))
}

fn message_in(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    for key in ["message", "error"] {
        if let Some(Value::String(s)) = map.get(key) {
            if !s.is_empty() {
                return Some(s.clone());
            }
        }
    }
    None
}

fn decode_items(items: Vec<Value>) -> Result<Vec<Entity>, RemoteError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Entity::from_object(map).map_err(|e| RemoteError::Shape {
                reason: e.to_string(),
            }),
            other => Err(RemoteError::Shape {
                reason: format!("expected entity object in list, got {other}"),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_enveloped_and_bare() {
        for value in [
            json!({"data": {"id": "real-1", "title": "A"}}),
            json!({"id": "real-1", "title": "A"}),
            json!({"data": {"data": {"id": "real-1", "title": "A"}}}),
        ] {
            let entity = unwrap_entity(value).unwrap();
            assert_eq!(entity.id.as_str(), "real-1");
            assert_eq!(entity.fields.get("title"), Some(&json!("A")));
        }
    }

    #[test]
    fn entity_shape_errors() {
        assert!(unwrap_entity(json!("nope")).is_err());
        assert!(unwrap_entity(json!({"data": 7})).is_err());
        assert!(unwrap_entity(json!({"title": "no id"})).is_err());
    }

    #[test]
    fn list_paged_envelope() {
        let value = json!({"data": {
            "items": [{"id": "a", "isDone": false}, {"id": "b", "isDone": true}],
            "total": 10,
            "page": 2,
            "pageSize": 2
        }});
        let page = unwrap_list(value).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 10);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 2);
    }

    #[test]
    fn list_bare_array() {
        let page = unwrap_list(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn stats_enveloped_and_bare() {
        let expected = Stats {
            total: 3,
            done: 1,
            not_done: 2,
        };
        let bare = json!({"total": 3, "done": 1, "notDone": 2});
        assert_eq!(unwrap_stats(bare.clone()).unwrap(), expected);
        assert_eq!(unwrap_stats(json!({"data": bare})).unwrap(), expected);
    }

    #[test]
    fn error_message_fallbacks() {
        assert_eq!(
            error_message(r#"{"message": "title required"}"#).as_deref(),
            Some("title required")
        );
        assert_eq!(
            error_message(r#"{"error": "forbidden"}"#).as_deref(),
            Some("forbidden")
        );
        assert_eq!(
            error_message(r#"{"data": {"message": "nested"}}"#).as_deref(),
            Some("nested")
        );
        assert_eq!(error_message("not json"), None);
        assert_eq!(error_message(r#"{"message": ""}"#), None);
    }
}
