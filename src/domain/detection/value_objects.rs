//! Detection Context - Value Objects

use serde::{Deserialize, Serialize};

/// 项目唯一标识（由后端分配的不透明字符串）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("project id cannot be empty");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 缓存组合键: (项目, 章节号)
///
/// 检测缓存的唯一寻址方式，同一个键同一时刻只对应一条记录
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetectionKey {
    pub project_id: ProjectId,
    pub chapter_number: u32,
}

impl DetectionKey {
    pub fn new(project_id: ProjectId, chapter_number: u32) -> Self {
        Self {
            project_id,
            chapter_number,
        }
    }
}

impl std::fmt::Display for DetectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.project_id, self.chapter_number)
    }
}
