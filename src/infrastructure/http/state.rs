//! Application State
//!
//! 请求之间唯一共享的内容：运行模式、启动时间、限流器

use std::sync::Arc;
use std::time::Instant;

use crate::application::{RateLimitStorePort, RateLimiter};
use crate::config::{AppConfig, RuntimeMode};

/// 应用状态
pub struct AppState {
    pub mode: RuntimeMode,
    pub started_at: Instant,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// 创建应用状态
    pub fn new(config: &AppConfig, rate_limit_store: Arc<dyn RateLimitStorePort>) -> Self {
        Self {
            mode: config.server.mode.clone(),
            started_at: Instant::now(),
            rate_limiter: RateLimiter::new(rate_limit_store, &config.rate_limit),
        }
    }

    /// 服务运行时长（秒）
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
