//! In-Memory Rate Limit Store Implementation

use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::application::ports::{RateLimitStorePort, WindowHit};

/// 内存限流计数存储
pub struct InMemoryRateLimitStore {
    windows: DashMap<String, WindowHit>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl Default for InMemoryRateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitStorePort for InMemoryRateLimitStore {
    fn hit(&self, key: &str, window: Duration, now: Instant) -> WindowHit {
        let fresh = WindowHit {
            count: 0,
            reset_at: now + window,
        };
        let mut entry = self.windows.entry(key.to_string()).or_insert(fresh);
        if entry.reset_at <= now {
            *entry = fresh;
        }
        entry.count = entry.count.saturating_add(1);
        *entry
    }

    fn purge_expired(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, hit| hit.reset_at > now);
        before.saturating_sub(self.windows.len())
    }
}
