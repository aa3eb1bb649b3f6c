//! Rate Limiter - 固定窗口限流策略
//!
//! 每个客户端在 `window` 内最多 `max_requests` 次请求，超出部分被拒绝直到窗口重置

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::application::ports::RateLimitStorePort;
use crate::config::RateLimitConfig;

/// 单次检查的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

impl RateLimitDecision {
    /// `Retry-After` 使用的秒数（向上取整）
    pub fn reset_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// `X-RateLimit-Reset` 使用的窗口重置时刻，Unix 秒（向上取整）
    pub fn reset_at_unix(&self, now: DateTime<Utc>) -> i64 {
        let millis = i64::try_from(self.reset_after.as_millis()).unwrap_or(i64::MAX);
        let reset_ms = now.timestamp_millis().saturating_add(millis);
        reset_ms.div_euclid(1000) + i64::from(reset_ms.rem_euclid(1000) > 0)
    }
}

/// 固定窗口限流器
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStorePort>,
    max_requests: u32,
    window: Duration,
    message: String,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStorePort>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            message: config.message.clone(),
        }
    }

    /// 超限时返回给客户端的消息
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let hit = self.store.hit(key, self.window, now);
        RateLimitDecision {
            allowed: hit.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(hit.count),
            reset_after: hit.reset_after(now),
        }
    }

    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryRateLimitStore;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        let config = RateLimitConfig {
            max_requests,
            window_secs,
            ..Default::default()
        };
        RateLimiter::new(Arc::new(InMemoryRateLimitStore::new()), &config)
    }

    #[test]
    fn test_rejects_after_limit_within_window() {
        let limiter = limiter(100, 900);
        let now = Instant::now();

        for i in 0..100 {
            let decision = limiter.check_at("10.0.0.1", now);
            assert!(decision.allowed, "request {} should pass", i + 1);
            assert_eq!(decision.remaining, 99 - i);
        }

        let decision = limiter.check_at("10.0.0.1", now + Duration::from_secs(60));
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.reset_after_secs(), 840);
    }

    #[test]
    fn test_reset_at_is_unix_timestamp() {
        use chrono::TimeZone;

        let decision = RateLimitDecision {
            allowed: true,
            limit: 100,
            remaining: 99,
            reset_after: Duration::from_secs(840),
        };
        let now = Utc.timestamp_millis_opt(1_700_000_000_500).unwrap();
        assert_eq!(decision.reset_at_unix(now), 1_700_000_841);

        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(decision.reset_at_unix(now), 1_700_000_840);
    }

    #[test]
    fn test_clients_are_counted_separately() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(2, 60);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now + Duration::from_secs(59)).allowed);
        assert!(limiter.check_at("a", now + Duration::from_secs(60)).allowed);
    }
}
