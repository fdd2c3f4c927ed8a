//! Progress Context - Snapshot

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// 进度快照校验错误
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Duplicate model key in snapshot: {0}")]
    DuplicateModelKey(String),

    #[error("Model {model_key} reports {completed} of {total} variants completed")]
    VariantOverflow {
        model_key: String,
        completed: u32,
        total: u32,
    },
}

/// 单个模型的生成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Pending,
    Generating,
    Stopping,
    Completed,
    Stopped,
    Error,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Pending => "pending",
            ModelStatus::Generating => "generating",
            ModelStatus::Stopping => "stopping",
            ModelStatus::Completed => "completed",
            ModelStatus::Stopped => "stopped",
            ModelStatus::Error => "error",
        }
    }
}

/// 单个模型的进度条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProgress {
    pub model_key: String,
    pub display_name: String,
    #[serde(default)]
    pub provider: Option<String>,
    pub status: ModelStatus,
    pub total_variants: u32,
    pub completed_variants: u32,
    /// 主模型标记（唯一性由服务端保证，这里不校验）
    pub is_primary: bool,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// 某个 (项目, 章节) 的生成进度快照
///
/// 获取后不可变，新的获取整体替换旧快照。
/// 反序列化一律经过校验，不存在绕过校验的解码路径。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct ProgressSnapshot {
    models: Vec<ModelProgress>,
}

/// 未校验的线上结构
#[derive(Deserialize)]
struct RawSnapshot {
    models: Vec<ModelProgress>,
}

impl TryFrom<RawSnapshot> for ProgressSnapshot {
    type Error = ProgressError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(raw.models.len());
        for model in &raw.models {
            if !seen.insert(model.model_key.as_str()) {
                return Err(ProgressError::DuplicateModelKey(model.model_key.clone()));
            }
            if model.completed_variants > model.total_variants {
                return Err(ProgressError::VariantOverflow {
                    model_key: model.model_key.clone(),
                    completed: model.completed_variants,
                    total: model.total_variants,
                });
            }
        }
        Ok(Self { models: raw.models })
    }
}

impl ProgressSnapshot {
    pub fn models(&self) -> &[ModelProgress] {
        &self.models
    }

    pub fn model(&self, model_key: &str) -> Option<&ModelProgress> {
        self.models.iter().find(|m| m.model_key == model_key)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
