//! Configuration Module
//!
//! 提供应用配置管理功能，支持多层级配置来源：
//! - 约定俗成的环境变量 `PORT` / `NODE_ENV` / `FRONTEND_URL`（最高优先级）
//! - 前缀环境变量 `LEARNING_*`
//! - 配置文件（TOML 格式）
//! - 默认值（最低优先级）

mod loader;
mod types;

pub use loader::{load_config, load_config_with, print_config, ConfigError, WellKnownEnv};
pub use types::{AppConfig, LogConfig, RateLimitConfig, RuntimeMode, ServerConfig};
