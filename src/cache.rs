use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use serde_json::Value;

pub const MAILING_LIST_PAGE: &str = "/mailing-list";
pub const ADMIN_SPONSORS_PAGE: &str = "/admin/sponsors";

pub fn hackathon_page(slug: &str) -> String {
    format!("/hackathons/{}", slug)
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    page: Option<Value>,
}

/// Rendered page payloads keyed by page path.
///
/// Reads fill the cache, writes call `revalidate` for every page they touch
/// and the next read rebuilds the entry. Entries never expire on their own.
///
/// Every path carries a generation that `revalidate` bumps. A reader takes
/// the generation before it loads from the store and hands it back to
/// `put_if_current`, so a load that raced a write is never stored.
#[derive(Clone, Default)]
pub struct PageCache {
    pages: Arc<DashMap<String, Slot>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.pages.get(path).and_then(|slot| slot.page.clone())
    }

    pub fn generation(&self, path: &str) -> u64 {
        self.pages.get(path).map_or(0, |slot| slot.generation)
    }

    /// Stores `page` unless the path was revalidated after `generation` was read.
    pub fn put_if_current(&self, path: &str, generation: u64, page: Value) -> bool {
        match self.pages.entry(path.to_string()) {
            Entry::Occupied(mut entry) if entry.get().generation == generation => {
                entry.get_mut().page = Some(page);
                true
            }
            Entry::Vacant(entry) if generation == 0 => {
                entry.insert(Slot {
                    generation,
                    page: Some(page),
                });
                true
            }
            _ => {
                tracing::debug!("Skipped caching {}, it changed while loading", path);
                false
            }
        }
    }

    pub fn revalidate(&self, path: &str) {
        let mut slot = self.pages.entry(path.to_string()).or_default();
        slot.generation += 1;
        if slot.page.take().is_some() {
            tracing::debug!("Revalidated cached page {}", path);
        }
    }

    #[cfg(test)]
    pub fn cached_pages(&self) -> usize {
        self.pages.iter().filter(|slot| slot.page.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn put(cache: &PageCache, path: &str, page: Value) {
        assert!(cache.put_if_current(path, cache.generation(path), page));
    }

    #[test]
    fn test_revalidate_drops_only_that_page() {
        let cache = PageCache::new();
        put(&cache, "/mailing-list", json!([1, 2]));
        put(&cache, "/hackathons/spring", json!({ "votes": 3 }));

        cache.revalidate("/mailing-list");

        assert!(cache.get("/mailing-list").is_none());
        assert_eq!(cache.get("/hackathons/spring"), Some(json!({ "votes": 3 })));
        assert_eq!(cache.cached_pages(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = PageCache::new();
        let other = cache.clone();
        put(&cache, ADMIN_SPONSORS_PAGE, json!([]));
        assert!(other.get(ADMIN_SPONSORS_PAGE).is_some());
        assert_eq!(hackathon_page("spring"), "/hackathons/spring");
    }

    #[test]
    fn test_load_that_raced_a_write_is_not_stored() {
        let cache = PageCache::new();

        let before_write = cache.generation(MAILING_LIST_PAGE);
        cache.revalidate(MAILING_LIST_PAGE);
        assert!(!cache.put_if_current(MAILING_LIST_PAGE, before_write, json!(["stale"])));
        assert!(cache.get(MAILING_LIST_PAGE).is_none());

        let after_write = cache.generation(MAILING_LIST_PAGE);
        assert!(cache.put_if_current(MAILING_LIST_PAGE, after_write, json!(["fresh"])));
        assert_eq!(cache.get(MAILING_LIST_PAGE), Some(json!(["fresh"])));
    }
}
