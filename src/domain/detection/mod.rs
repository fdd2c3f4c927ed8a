//! Detection Context - AI 检测上下文
//!
//! 职责:
//! - (项目, 章节) 组合键
//! - 检测记录及 idle/running/success/error 状态机

mod record;
mod value_objects;

pub use record::{DetectionRecord, DetectionResult, DetectionStatus, Segment};
pub use value_objects::{DetectionKey, ProjectId};
