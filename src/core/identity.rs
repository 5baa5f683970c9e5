//! Layer 0: Identity atoms
//!
//! RemoteId: server-assigned entity identifier
//! TempId: client-generated placeholder, "tmp-{wall_ms}-{suffix}"
//! EntityId: either of the above
//! ResourceName: REST collection path segment
//! ResourceSpec: collection name paired with its done field

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{CoreError, InvalidField, InvalidId};

/// Alphabet for temp-id suffixes - lowercase alphanumeric.
const TEMP_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const TEMP_PREFIX: &str = "tmp-";
const TEMP_SUFFIX_LEN: usize = 6;

/// Server-assigned identifier - non-empty, no whitespace.
///
/// The backend chooses the format; we only reject obviously broken values.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteId(String);

impl RemoteId {
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidId::Entity {
                raw: s,
                reason: "empty".into(),
            }
            .into());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidId::Entity {
                raw: s,
                reason: "cannot contain whitespace".into(),
            }
            .into());
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemoteId({:?})", self.0)
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RemoteId {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        RemoteId::parse(s)
    }
}

impl From<RemoteId> for String {
    fn from(id: RemoteId) -> String {
        id.0
    }
}

/// Client-generated placeholder identifier - "tmp-{wall_ms}-{suffix}".
///
/// Stands in for an entity between optimistic insert and reconciliation.
/// Never sent to the server.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TempId(String);

impl TempId {
    /// Generate a fresh temp id from the current wall clock.
    pub fn generate() -> Self {
        use rand::Rng;
        use std::time::{SystemTime, UNIX_EPOCH};

        let wall_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut rng = rand::rng();
        let suffix: String = (0..TEMP_SUFFIX_LEN)
            .map(|_| {
                let idx = rng.random_range(0..TEMP_ALPHABET.len());
                TEMP_ALPHABET[idx] as char
            })
            .collect();

        Self(format!("{TEMP_PREFIX}{wall_ms}-{suffix}"))
    }

    /// Parse and validate a temp id string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let Some(rest) = s.strip_prefix(TEMP_PREFIX) else {
            return Err(InvalidId::Temp {
                raw: s.to_string(),
                reason: format!("must start with '{TEMP_PREFIX}'"),
            }
            .into());
        };
        let Some((wall, suffix)) = rest.split_once('-') else {
            return Err(InvalidId::Temp {
                raw: s.to_string(),
                reason: "missing suffix".into(),
            }
            .into());
        };
        if wall.is_empty() || !wall.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidId::Temp {
                raw: s.to_string(),
                reason: "timestamp part must be decimal digits".into(),
            }
            .into());
        }
        if suffix.is_empty() || suffix.bytes().any(|b| !TEMP_ALPHABET.contains(&b)) {
            return Err(InvalidId::Temp {
                raw: s.to_string(),
                reason: "suffix must be lowercase alphanumeric".into(),
            }
            .into());
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TempId({:?})", self.0)
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TempId {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        TempId::parse(&s)
    }
}

impl From<TempId> for String {
    fn from(id: TempId) -> String {
        id.0
    }
}

/// Entity identifier - server-assigned or a local placeholder.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntityId {
    Remote(RemoteId),
    Local(TempId),
}

impl EntityId {
    /// Parse an id string. The "tmp-" prefix marks a local placeholder;
    /// anything else is taken as a server id.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.starts_with(TEMP_PREFIX) {
            Ok(EntityId::Local(TempId::parse(s)?))
        } else {
            Ok(EntityId::Remote(RemoteId::parse(s)?))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntityId::Remote(id) => id.as_str(),
            EntityId::Local(id) => id.as_str(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, EntityId::Local(_))
    }
}

impl From<RemoteId> for EntityId {
    fn from(id: RemoteId) -> Self {
        EntityId::Remote(id)
    }
}

impl From<TempId> for EntityId {
    fn from(id: TempId) -> Self {
        EntityId::Local(id)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Remote(id) => write!(f, "EntityId({:?})", id),
            EntityId::Local(id) => write!(f, "EntityId({:?})", id),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for EntityId {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        EntityId::parse(&s)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.as_str().to_string()
    }
}

/// REST collection path segment - non-empty, lowercase alphanumeric plus
/// '-' and '_'.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into().trim().to_string();
        if s.is_empty() {
            return Err(InvalidId::Resource {
                raw: s,
                reason: "empty".into(),
            }
            .into());
        }
        let ok = s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        if !ok {
            return Err(InvalidId::Resource {
                raw: s,
                reason: "must be lowercase alphanumeric, '-' or '_'".into(),
            }
            .into());
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceName({:?})", self.0)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ResourceName {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        ResourceName::parse(s)
    }
}

impl From<ResourceName> for String {
    fn from(r: ResourceName) -> String {
        r.0
    }
}

/// A collection endpoint paired with its completion-flag field name.
///
/// Built once (usually from config) and handed to both the store and the
/// transport, so the two can never disagree on the done field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceSpec {
    name: ResourceName,
    done_field: String,
}

impl ResourceSpec {
    pub fn new(name: ResourceName, done_field: impl Into<String>) -> Result<Self, CoreError> {
        let done_field = done_field.into();
        if done_field.is_empty() {
            return Err(InvalidField {
                field: "done_field".into(),
                reason: "empty".into(),
            }
            .into());
        }
        Ok(Self { name, done_field })
    }

    pub fn parse(name: &str, done_field: &str) -> Result<Self, CoreError> {
        Self::new(ResourceName::parse(name)?, done_field)
    }

    pub fn name(&self) -> &ResourceName {
        &self.name
    }

    pub fn done_field(&self) -> &str {
        &self.done_field
    }
}
