//! In-process relay statistics.
//!
//! Plain atomic counters, owned by the application state and rendered by
//! the `/status` command. Nothing here is persisted.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::pipeline::RejectReason;

#[derive(Debug)]
pub struct RelayStats {
    started_at: DateTime<Utc>,
    received: AtomicU64,
    forwarded: AtomicU64,
    filtered: AtomicU64,
    errors: AtomicU64,
    filtered_blacklist: AtomicU64,
    filtered_duplicate: AtomicU64,
    filtered_language: AtomicU64,
    filtered_links: AtomicU64,
    last_forwarded: Mutex<Option<DateTime<Utc>>>,
}

/// Point-in-time copy of the counters, for rendering.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub received: u64,
    pub forwarded: u64,
    pub filtered: u64,
    pub errors: u64,
    pub filtered_blacklist: u64,
    pub filtered_duplicate: u64,
    pub filtered_language: u64,
    pub filtered_links: u64,
    pub last_forwarded: Option<DateTime<Utc>>,
}

impl RelayStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            received: AtomicU64::new(0),
            forwarded: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            filtered_blacklist: AtomicU64::new(0),
            filtered_duplicate: AtomicU64::new(0),
            filtered_language: AtomicU64::new(0),
            filtered_links: AtomicU64::new(0),
            last_forwarded: Mutex::new(None),
        }
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
        *self.last_forwarded.lock() = Some(Utc::now());
    }

    pub fn record_filtered(&self, reason: RejectReason) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
        let per_reason = match reason {
            RejectReason::Blacklisted => &self.filtered_blacklist,
            RejectReason::Duplicate => &self.filtered_duplicate,
            RejectReason::LanguageBlocked => &self.filtered_language,
            RejectReason::ContainsLinks => &self.filtered_links,
            _ => return,
        };
        per_reason.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            received: self.received.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            filtered_blacklist: self.filtered_blacklist.load(Ordering::Relaxed),
            filtered_duplicate: self.filtered_duplicate.load(Ordering::Relaxed),
            filtered_language: self.filtered_language.load(Ordering::Relaxed),
            filtered_links: self.filtered_links.load(Ordering::Relaxed),
            last_forwarded: *self.last_forwarded.lock(),
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}
