//! Learning Companion - AI 学习助手 API
//!
//! 应用层 (application/):
//! - Ports: 端口定义（RateLimitStore）
//! - RateLimiter: 固定窗口限流策略
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API、中间件、错误归一化
//! - Memory: 限流计数的内存实现

pub mod application;
pub mod config;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
