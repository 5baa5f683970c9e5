//! Layer 3: Derived aggregate statistics
//!
//! Stats are computed, never mutated. The collection recomputes them after
//! every mutation so a fresh collection is never paired with a stale count.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Counts derived from the collection. Matches the server's
/// `/stats/summary` payload shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub done: usize,
    pub not_done: usize,
}

impl Stats {
    /// Full reduce over a collection snapshot.
    pub fn compute<'a>(entities: impl Iterator<Item = &'a Entity>, done_field: &str) -> Self {
        let mut stats = Stats::default();
        for entity in entities {
            stats.total += 1;
            if entity.is_done(done_field) {
                stats.done += 1;
            } else {
                stats.not_done += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, Fields};
    use serde_json::json;

    fn entity(id: &str, done: bool) -> Entity {
        let mut fields = Fields::new();
        fields.set("isDone", json!(done));
        Entity::new(EntityId::parse(id).unwrap(), fields)
    }

    #[test]
    fn compute_counts() {
        let items = vec![entity("a", true), entity("b", false), entity("c", true)];
        let stats = Stats::compute(items.iter(), "isDone");
        assert_eq!(
            stats,
            Stats {
                total: 3,
                done: 2,
                not_done: 1
            }
        );
    }

    #[test]
    fn compute_empty() {
        let stats = Stats::compute(std::iter::empty(), "isDone");
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn serde_uses_camel_case() {
        let s: Stats = serde_json::from_value(json!({"total": 2, "done": 1, "notDone": 1})).unwrap();
        assert_eq!(s.not_done, 1);
    }
}
