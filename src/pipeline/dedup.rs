//! Duplicate-content cache.
//!
//! Bounded set of content hashes already relayed. Entries are never
//! expired by time, only by capacity eviction or the admin full-clear.
//! The capacity bound is approximate while evictions are pending, which
//! matches the intent of the original design (a hard cap on memory, not
//! an exact LRU contract).

use moka::sync::Cache;

use super::view::ContentHash;

pub struct DedupCache {
    inner: Cache<ContentHash, ()>,
}

impl DedupCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Record the hash if unseen. Returns `true` when the content is
    /// fresh (message should be relayed), `false` on a duplicate.
    pub fn check_and_record(&self, hash: ContentHash) -> bool {
        if self.inner.contains_key(&hash) {
            return false;
        }
        self.inner.insert(hash, ());
        true
    }

    /// Forget every recorded hash. Exposed to admins via `/clearmemory`.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(n: u64) -> ContentHash {
        let mut h = [0u8; 32];
        h[..8].copy_from_slice(&n.to_le_bytes());
        h
    }

    #[test]
    fn first_sighting_admits_second_rejects() {
        let cache = DedupCache::new(100);
        let h = hash_of(1);
        assert!(cache.check_and_record(h));
        assert!(!cache.check_and_record(h));
    }

    #[test]
    fn clear_forgets_everything() {
        let cache = DedupCache::new(100);
        let h = hash_of(2);
        assert!(cache.check_and_record(h));
        cache.clear();
        assert!(cache.check_and_record(h));
    }

    #[test]
    fn capacity_stays_bounded() {
        let cache = DedupCache::new(50);
        for n in 0..500 {
            cache.check_and_record(hash_of(n));
        }
        assert!(cache.len() <= 50);
    }
}
