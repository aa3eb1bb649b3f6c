//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::fmt;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 限流配置
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 运行模式（对应 `NODE_ENV`）
///
/// 只有显式的 `development` 会在错误响应中暴露 stack，只有 `production` 会收紧 CORS。
/// 未设置或空字符串为 `Unset`，其它取值（如 `staging`）保留原文
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RuntimeMode {
    Development,
    Production,
    Test,
    #[default]
    Unset,
    Other(String),
}

impl From<String> for RuntimeMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "development" => RuntimeMode::Development,
            "production" => RuntimeMode::Production,
            "test" => RuntimeMode::Test,
            "" => RuntimeMode::Unset,
            _ => RuntimeMode::Other(value),
        }
    }
}

impl RuntimeMode {
    pub fn is_development(&self) -> bool {
        matches!(self, RuntimeMode::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, RuntimeMode::Production)
    }

    /// 启动日志中显示的名称，未设置时显示 development
    pub fn as_str(&self) -> &str {
        match self {
            RuntimeMode::Development | RuntimeMode::Unset => "development",
            RuntimeMode::Production => "production",
            RuntimeMode::Test => "test",
            RuntimeMode::Other(name) => name,
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 运行模式
    #[serde(default)]
    pub mode: RuntimeMode,

    /// 前端地址，production 模式下作为唯一允许的 CORS origin
    #[serde(default)]
    pub frontend_url: Option<String>,

    /// 请求体大小上限（字节）
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024 // 50 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mode: RuntimeMode::default(),
            frontend_url: None,
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 非 production 模式下允许的本地前端地址
    pub const LOCAL_ORIGINS: [&'static str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

    /// CORS 允许的 origin 列表
    pub fn allowed_origins(&self) -> Vec<String> {
        if self.mode.is_production() {
            self.frontend_url.iter().cloned().collect()
        } else {
            Self::LOCAL_ORIGINS.iter().map(|o| o.to_string()).collect()
        }
    }
}

/// 限流配置（固定窗口，按客户端 IP 计数）
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// 窗口内允许的最大请求数
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// 窗口长度（秒）
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// 超限时返回的消息
    #[serde(default = "default_rate_limit_message")]
    pub message: String,
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    15 * 60 // 15 分钟
}

fn default_rate_limit_message() -> String {
    "Too many requests from this IP, please try again later.".to_string()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            message: default_rate_limit_message(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.mode, RuntimeMode::Unset);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 900);
    }

    #[test]
    fn test_runtime_mode_from_node_env() {
        assert_eq!(RuntimeMode::from("development".to_string()), RuntimeMode::Development);
        assert_eq!(RuntimeMode::from(String::new()), RuntimeMode::Unset);
        assert_eq!(
            RuntimeMode::from("Development".to_string()),
            RuntimeMode::Other("Development".to_string())
        );

        let staging = RuntimeMode::from("staging".to_string());
        assert!(!staging.is_development());
        assert!(!staging.is_production());
        assert_eq!(staging.to_string(), "staging");

        assert!(!RuntimeMode::Unset.is_development());
        assert_eq!(RuntimeMode::Unset.to_string(), "development");
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_allowed_origins_by_mode() {
        let mut config = ServerConfig::default();
        assert_eq!(
            config.allowed_origins(),
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );

        config.mode = RuntimeMode::Production;
        config.frontend_url = Some("https://learn.example.com".to_string());
        assert_eq!(config.allowed_origins(), vec!["https://learn.example.com"]);
    }
}
