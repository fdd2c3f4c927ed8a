//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 后端 API 配置
    #[serde(default)]
    pub api: ApiConfig,

    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// AI 检测配置
    #[serde(default)]
    pub detection: DetectionConfig,

    /// 生成进度轮询配置
    #[serde(default)]
    pub progress: ProgressConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 后端 API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 后端基础 URL（不含 /api 前缀）
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 连接超时时间（秒），请求本身不设客户端超时
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ApiConfig {
    /// 生成域 base URL
    pub fn generation_base_url(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }

    /// 向量域 base URL
    pub fn vector_base_url(&self) -> String {
        format!("{}/api/vector", self.base_url.trim_end_matches('/'))
    }
}

/// 认证配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Bearer token，缺省表示未登录
    #[serde(default)]
    pub token: Option<String>,
}

/// AI 检测配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionConfig {
    /// 转发给服务端的检测超时（秒），缺省使用服务端默认值
    #[serde(default)]
    pub timeout_secs: Option<f64>,
}

/// 生成进度轮询配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// 轮询间隔（毫秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval() -> u64 {
    1500
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
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
