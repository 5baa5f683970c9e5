//! Layer 5: Derived view
//!
//! Pure projection of (collection, filter, sort), memoized on the
//! collection version and equality of the two predicates. No other caching.

use super::entity::Entity;
use super::filter::{ListFilter, SortKey};
use super::store::Collection;

#[derive(Debug, Default)]
pub struct View {
    cache: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    version: u64,
    filter: ListFilter,
    sort: Option<SortKey>,
    items: Vec<Entity>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filtered/sorted projection. Recomputes only when the collection
    /// version or either predicate changed since the last call.
    pub fn project(
        &mut self,
        collection: &Collection,
        filter: &ListFilter,
        sort: Option<&SortKey>,
    ) -> &[Entity] {
        let fresh = match &self.cache {
            Some(c) => {
                c.version == collection.version()
                    && &c.filter == filter
                    && c.sort.as_ref() == sort
            }
            None => false,
        };

        if !fresh {
            let mut items: Vec<Entity> = collection
                .iter()
                .filter(|e| filter.matches(e, collection.done_field()))
                .cloned()
                .collect();
            if let Some(key) = sort {
                items.sort_by(|a, b| key.compare(a, b));
            }
            self.cache = Some(CacheEntry {
                version: collection.version(),
                filter: filter.clone(),
                sort: sort.cloned(),
                items,
            });
        }

        match &self.cache {
            Some(c) => &c.items,
            None => &[],
        }
    }

    /// True when the last projection is still valid for these inputs.
    /// Test seam for the memoization contract.
    pub fn is_fresh(
        &self,
        collection: &Collection,
        filter: &ListFilter,
        sort: Option<&SortKey>,
    ) -> bool {
        match &self.cache {
            Some(c) => {
                c.version == collection.version()
                    && &c.filter == filter
                    && c.sort.as_ref() == sort
            }
            None => false,
        }
    }
}
