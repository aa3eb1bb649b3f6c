//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 约定俗成的环境变量 `PORT` / `NODE_ENV` / `FRONTEND_URL`
//! 2. 带前缀的环境变量（`LEARNING_`）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use http::HeaderValue;
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 部署平台常用的无前缀环境变量
#[derive(Debug, Clone, Default)]
pub struct WellKnownEnv {
    pub port: Option<String>,
    pub node_env: Option<String>,
    pub frontend_url: Option<String>,
}

impl WellKnownEnv {
    /// 从进程环境读取
    pub fn from_process_env() -> Self {
        Self {
            port: std::env::var("PORT").ok(),
            node_env: std::env::var("NODE_ENV").ok(),
            frontend_url: std::env::var("FRONTEND_URL").ok(),
        }
    }
}

/// 加载应用配置
///
/// 会先尝试加载 `.env` 文件，再按优先级合并配置
///
/// # 环境变量示例
/// - `PORT=8080`
/// - `NODE_ENV=production`
/// - `FRONTEND_URL=https://learn.example.com`
/// - `LEARNING_RATE_LIMIT__MAX_REQUESTS=200`
/// - `LEARNING_LOG__JSON=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_with(None, &WellKnownEnv::from_process_env())
}

/// 从指定路径和显式的环境变量加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
/// - `env` - `PORT` / `NODE_ENV` / `FRONTEND_URL` 的取值
pub fn load_config_with(
    config_path: Option<&Path>,
    env: &WellKnownEnv,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("server.body_limit_bytes", 50_i64 * 1024 * 1024)?
        .set_default("rate_limit.max_requests", 100)?
        .set_default("rate_limit.window_secs", 15 * 60)?
        .set_default(
            "rate_limit.message",
            "Too many requests from this IP, please try again later.",
        )?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 前缀环境变量，例如 LEARNING_SERVER__HOST=127.0.0.1
    builder = builder.add_source(
        Environment::with_prefix("LEARNING")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 无前缀环境变量（最高优先级）
    let port = env
        .port
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::ParseError(format!("Invalid PORT '{}': {}", raw, e)))
        })
        .transpose()?;
    builder = builder
        .set_override_option("server.port", port.map(i64::from))?
        .set_override_option("server.mode", env.node_env.clone())?
        .set_override_option("server.frontend_url", env.frontend_url.clone())?;

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.rate_limit.max_requests == 0 {
        return Err(ConfigError::ValidationError(
            "Rate limit max_requests cannot be 0".to_string(),
        ));
    }

    if config.rate_limit.window_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Rate limit window cannot be 0".to_string(),
        ));
    }

    if config.server.mode.is_production() {
        match config.server.frontend_url.as_deref() {
            None | Some("") => {
                return Err(ConfigError::ValidationError(
                    "FRONTEND_URL is required in production".to_string(),
                ));
            }
            Some(url) => {
                HeaderValue::from_str(url).map_err(|_| {
                    ConfigError::ValidationError(format!("FRONTEND_URL is not a valid origin: {}", url))
                })?;
            }
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Environment: {}", config.server.mode);
    tracing::info!("CORS Origins: {:?}", config.server.allowed_origins());
    tracing::info!("Body Limit: {} bytes", config.server.body_limit_bytes);
    tracing::info!(
        "Rate Limit: {} requests / {}s",
        config.rate_limit.max_requests,
        config.rate_limit.window_secs
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeMode;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_window() {
        let mut config = AppConfig::default();
        config.rate_limit.window_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_production_requires_frontend_url() {
        let mut config = AppConfig::default();
        config.server.mode = RuntimeMode::Production;
        assert!(validate_config(&config).is_err());

        config.server.frontend_url = Some("https://learn.example.com".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_well_known_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 7000\n\n[rate_limit]\nmax_requests = 20\nwindow_secs = 60"
        )
        .unwrap();

        let env = WellKnownEnv {
            port: Some("8080".to_string()),
            node_env: Some("production".to_string()),
            frontend_url: Some("https://learn.example.com".to_string()),
        };
        let config = load_config_with(Some(file.path()), &env).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.mode, RuntimeMode::Production);
        assert_eq!(
            config.server.frontend_url.as_deref(),
            Some("https://learn.example.com")
        );
        assert_eq!(config.rate_limit.max_requests, 20);
        assert_eq!(config.rate_limit.window_secs, 60);
    }

    #[test]
    fn test_unset_node_env_is_not_development() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let config = load_config_with(Some(file.path()), &WellKnownEnv::default()).unwrap();

        assert_eq!(config.server.mode, RuntimeMode::Unset);
        assert!(!config.server.mode.is_development());
    }

    #[test]
    fn test_any_node_env_is_accepted() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let load = |node_env: &str| {
            let env = WellKnownEnv {
                node_env: Some(node_env.to_string()),
                ..Default::default()
            };
            load_config_with(Some(file.path()), &env).map(|c| c.server.mode)
        };

        assert_eq!(
            load("staging").unwrap(),
            RuntimeMode::Other("staging".to_string())
        );
        assert_eq!(load("").unwrap(), RuntimeMode::Unset);
        assert_eq!(load("development").unwrap(), RuntimeMode::Development);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = WellKnownEnv {
            port: Some("not-a-port".to_string()),
            ..Default::default()
        };
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            load_config_with(Some(file.path()), &env),
            Err(ConfigError::ParseError(_))
        ));
    }
}
