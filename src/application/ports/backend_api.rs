//! Backend API Ports - 检测与生成服务的出站端口
//!
//! 每个操作都是一次经过请求信封的调用，不缓存、不重试

use async_trait::async_trait;
use serde::Serialize;

use crate::application::error::ClientError;
use crate::domain::{DetectionKey, DetectionResult, ProgressSnapshot, ProjectId};

/// 触发检测的请求体
///
/// text 为空表示使用章节当前选定版本；timeout_seconds 原样转发给服务端
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunDetectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<f64>,
}

impl RunDetectionRequest {
    pub fn new(text: Option<String>, timeout_seconds: Option<f64>) -> Self {
        Self {
            text: text.filter(|t| !t.is_empty()),
            timeout_seconds,
        }
    }
}

/// AI 检测服务
#[async_trait]
pub trait DetectionApiPort: Send + Sync {
    /// 获取最近一次检测结果（只读）
    async fn fetch_detection(&self, key: &DetectionKey) -> Result<DetectionResult, ClientError>;

    /// 执行一次检测
    async fn run_detection(
        &self,
        key: &DetectionKey,
        request: RunDetectionRequest,
    ) -> Result<DetectionResult, ClientError>;
}

/// 章节生成服务
#[async_trait]
pub trait GenerationApiPort: Send + Sync {
    /// 获取多模型生成进度快照
    async fn fetch_generation_progress(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
    ) -> Result<ProgressSnapshot, ClientError>;

    /// 请求服务端停止某个模型的生成
    ///
    /// 这是独立的服务端请求，不会取消本地进行中的调用
    async fn stop_model_generation(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
        model_key: &str,
    ) -> Result<(), ClientError>;
}
