//! Rate Limit Store Port - 限流计数存储
//!
//! 定义固定窗口计数的抽象接口，具体实现在 infrastructure/memory 层

use std::time::{Duration, Instant};

/// 某个客户端在当前窗口内的计数快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    /// 当前窗口内（含本次）的请求数
    pub count: u32,
    /// 当前窗口的结束时间
    pub reset_at: Instant,
}

impl WindowHit {
    /// 距离窗口重置的剩余时间
    pub fn reset_after(&self, now: Instant) -> Duration {
        self.reset_at.saturating_duration_since(now)
    }
}

/// Rate Limit Store Port
///
/// 每个 key 维护一个固定窗口：窗口过期后的第一次命中开启新窗口
pub trait RateLimitStorePort: Send + Sync {
    /// 记录一次命中并返回计数
    fn hit(&self, key: &str, window: Duration, now: Instant) -> WindowHit;

    /// 清理已过期的窗口，返回清理数量
    fn purge_expired(&self, now: Instant) -> usize;
}
