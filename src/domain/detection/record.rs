//! Detection Context - 检测记录
//!
//! 状态机: idle → running → {success, error}
//! - success → running（重新检测）
//! - error → running（重试）
//! - 任意状态 → idle（invalidate）
//!
//! 没有终止状态，任何状态都可以通过新的检测回到 running

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 检测状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    /// 未检测 / 已失效
    #[default]
    Idle,
    /// 检测中
    Running,
    /// 检测成功
    Success,
    /// 检测失败
    Error,
}

impl DetectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionStatus::Idle => "idle",
            DetectionStatus::Running => "running",
            DetectionStatus::Success => "success",
            DetectionStatus::Error => "error",
        }
    }
}

/// 分段检测结果
///
/// label: 0=人工, 1=AI, 2=疑似
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: i32,
    pub text: String,
}

/// 后端返回的检测结果
///
/// `status` 可能缺省，缺省时由调用方决定默认值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub status: Option<DetectionStatus>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub available_uses: Option<i64>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub text_hash: Option<String>,
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// 缓存中的检测记录
///
/// 每个键同一时刻只有一条记录，写入总是整体替换
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub status: DetectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_uses: Option<i64>,
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// 最后写入时间，由缓存在每次写入时设置
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DetectionRecord {
    /// 空闲记录（未见过的键、或 invalidate 之后）
    pub fn idle() -> Self {
        Self::default()
    }

    /// 从后端结果构建记录，status 缺省时视为 success
    ///
    /// error_message 只在最终状态为 error 时保留
    pub fn from_result(result: DetectionResult) -> Self {
        let status = result.status.unwrap_or(DetectionStatus::Success);
        let error_message = match status {
            DetectionStatus::Error => result.error_message,
            _ => None,
        };
        Self {
            status,
            confidence: result.confidence,
            available_uses: result.available_uses,
            segments: result.segments,
            text_hash: result.text_hash,
            content_hash: result.content_hash,
            error_message,
            updated_at: None,
        }
    }

    /// 乐观地切换到 running，保留已有结果字段
    pub fn to_running(&self) -> Self {
        Self {
            status: DetectionStatus::Running,
            error_message: None,
            ..self.clone()
        }
    }

    /// 失败回滚：恢复 previous 的所有字段，只改 status 和 error_message
    pub fn to_failed(previous: DetectionRecord, message: impl Into<String>) -> Self {
        Self {
            status: DetectionStatus::Error,
            error_message: Some(message.into()),
            ..previous
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == DetectionStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> DetectionResult {
        DetectionResult {
            status: None,
            confidence: Some(0.87),
            available_uses: Some(9),
            segments: vec![Segment {
                label: 1,
                text: "...".to_string(),
            }],
            text_hash: Some("t".to_string()),
            content_hash: Some("c".to_string()),
            error_message: None,
        }
    }

    #[test]
    fn test_idle_record_is_empty() {
        let record = DetectionRecord::idle();
        assert_eq!(record.status, DetectionStatus::Idle);
        assert!(record.confidence.is_none());
        assert!(record.segments.is_empty());
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_from_result_defaults_to_success() {
        let record = DetectionRecord::from_result(sample_result());
        assert_eq!(record.status, DetectionStatus::Success);
        assert_eq!(record.confidence, Some(0.87));
        assert_eq!(record.segments.len(), 1);
    }

    #[test]
    fn test_from_result_keeps_server_status() {
        let mut result = sample_result();
        result.status = Some(DetectionStatus::Error);
        result.error_message = Some("quota exhausted".to_string());
        let record = DetectionRecord::from_result(result);
        assert_eq!(record.status, DetectionStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some("quota exhausted"));
    }

    #[test]
    fn test_from_result_drops_stray_error_message_on_success() {
        let mut result = sample_result();
        result.status = Some(DetectionStatus::Success);
        result.error_message = Some("leftover".to_string());
        let record = DetectionRecord::from_result(result);
        assert!(record.error_message.is_none());
    }

    #[test]
    fn test_running_and_failed_keep_previous_fields() {
        let success = DetectionRecord::from_result(sample_result());

        let running = success.to_running();
        assert!(running.is_running());
        assert_eq!(running.confidence, success.confidence);

        let failed = DetectionRecord::to_failed(success.clone(), "timeout");
        assert_eq!(failed.status, DetectionStatus::Error);
        assert_eq!(failed.error_message.as_deref(), Some("timeout"));
        assert_eq!(failed.segments, success.segments);
        assert_eq!(failed.text_hash, success.text_hash);
        assert_eq!(failed.content_hash, success.content_hash);
    }

    #[test]
    fn test_status_decoding() {
        let result: DetectionResult =
            serde_json::from_str(r#"{"status":"running","segments":[]}"#).unwrap();
        assert_eq!(result.status, Some(DetectionStatus::Running));

        let result: DetectionResult = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(result.status, None);
        assert!(result.segments.is_empty());

        assert!(serde_json::from_str::<DetectionResult>(r#"{"status":"queued"}"#).is_err());
        assert_eq!(DetectionStatus::Running.as_str(), "running");
    }
}
