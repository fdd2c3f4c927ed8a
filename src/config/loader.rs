//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
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

/// 加载应用配置
///
/// # 环境变量示例
/// - `NOVEL_DESK_API__BASE_URL=http://backend:8000`
/// - `NOVEL_DESK_AUTH__TOKEN=eyJhbGciOi...`
/// - `NOVEL_DESK_DETECTION__TIMEOUT_SECS=60`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("api.base_url", "http://127.0.0.1:8000")?
        .set_default("api.connect_timeout_secs", 10)?
        .set_default("progress.poll_interval_ms", 1500)?
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

    // 3. 环境变量（最高优先级）
    // 前缀: NOVEL_DESK_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix("NOVEL_DESK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "API base URL cannot be empty".to_string(),
        ));
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "API base URL must start with http:// or https://, got {}",
            base_url
        )));
    }

    if config.progress.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Progress poll interval cannot be 0".to_string(),
        ));
    }

    // 服务端要求 timeout_seconds >= 1
    if let Some(timeout) = config.detection.timeout_secs {
        if timeout < 1.0 {
            return Err(ConfigError::ValidationError(format!(
                "Detection timeout must be at least 1 second, got {}",
                timeout
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::debug!("=== Application Configuration ===");
    tracing::debug!("API Base URL: {}", config.api.base_url);
    tracing::debug!("Connect Timeout: {}s", config.api.connect_timeout_secs);
    tracing::debug!("Authenticated: {}", config.auth.token.is_some());
    if let Some(timeout) = config.detection.timeout_secs {
        tracing::debug!("Detection Timeout: {}s", timeout);
    }
    tracing::debug!("Progress Poll Interval: {}ms", config.progress.poll_interval_ms);
    tracing::debug!("Log Level: {}", config.log.level);
    tracing::debug!("=================================");
}
