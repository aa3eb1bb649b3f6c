//! 应用层
//!
//! 包含：
//! - ports: 端口定义（限流计数存储）
//! - rate_limit: 固定窗口限流策略

pub mod ports;
pub mod rate_limit;

pub use ports::{RateLimitStorePort, WindowHit};
pub use rate_limit::{RateLimitDecision, RateLimiter};
