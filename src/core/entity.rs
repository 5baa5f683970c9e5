//! Layer 2: The Entity
//!
//! Entity: identifier + field map. The identifier is a local placeholder
//! until the first successful create confirms a server-assigned one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{CoreError, InvalidField};
use super::fields::Fields;
use super::identity::EntityId;

/// One record of the mirrored collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity {
    pub fn new(id: EntityId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Completion flag under the resource's designated field name.
    pub fn is_done(&self, done_field: &str) -> bool {
        self.fields.flag(done_field)
    }

    /// Decode a wire object: an `id` member plus arbitrary other fields.
    pub fn from_object(mut map: Map<String, Value>) -> Result<Self, CoreError> {
        let id = match map.remove("id") {
            Some(Value::String(s)) => EntityId::parse(&s)?,
            Some(other) => {
                // Some backends hand out numeric ids.
                if let Value::Number(n) = &other {
                    EntityId::parse(&n.to_string())?
                } else {
                    return Err(InvalidField {
                        field: "id".into(),
                        reason: format!("expected string or number, got {other}"),
                    }
                    .into());
                }
            }
            None => {
                return Err(InvalidField {
                    field: "id".into(),
                    reason: "missing".into(),
                }
                .into())
            }
        };
        Ok(Self::new(id, Fields::from_map(map)))
    }

    /// Encode back to a wire object.
    pub fn to_object(&self) -> Map<String, Value> {
        let mut map = self.fields.as_map().clone();
        map.insert("id".into(), Value::String(self.id.as_str().to_string()));
        map
    }
}
