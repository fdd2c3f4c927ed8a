//! Domain Layer - 领域层
//!
//! 包含两个上下文:
//! - Detection Context: AI 检测结果及其状态机
//! - Progress Context: 多模型章节生成进度快照（只读）

pub mod detection;
pub mod progress;

pub use detection::{
    DetectionKey, DetectionRecord, DetectionResult, DetectionStatus, ProjectId, Segment,
};
pub use progress::{ModelProgress, ModelStatus, ProgressError, ProgressSnapshot};
