//! Novel DTOs - 生成域请求/响应结构
//!
//! 字段形状与后端 `/api/novels`、`/api/writer` 保持一致

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 章节生成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    NotGenerated,
    Generating,
    Evaluating,
    Selecting,
    Failed,
    EvaluationFailed,
    WaitingForConfirm,
    Successful,
}

/// 多模型生成时单个模型出错后的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStrategy {
    #[default]
    Stop,
    Continue,
}

/// 项目分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovelSection {
    Overview,
    WorldSetting,
    Characters,
    Relationships,
    ChapterOutline,
    Chapters,
}

impl NovelSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelSection::Overview => "overview",
            NovelSection::WorldSetting => "world_setting",
            NovelSection::Characters => "characters",
            NovelSection::Relationships => "relationships",
            NovelSection::ChapterOutline => "chapter_outline",
            NovelSection::Chapters => "chapters",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelProject {
    pub id: String,
    pub title: String,
    pub initial_prompt: String,
    #[serde(default)]
    pub blueprint: Option<Blueprint>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelProjectSummary {
    pub id: String,
    pub title: String,
    pub genre: String,
    pub last_edited: String,
    pub completed_chapters: u32,
    pub total_chapters: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_sentence_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_setting: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<Character>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_outline: Option<Vec<ChapterOutline>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_to_protagonist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterOutline {
    pub chapter_number: u32,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterVersion {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_number: u32,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub versions: Option<Vec<ChapterVersion>>,
    #[serde(default)]
    pub evaluation: Option<String>,
    #[serde(default)]
    pub evaluation_created_at: Option<String>,
    pub generation_status: GenerationStatus,
    #[serde(default)]
    pub word_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiControl {
    /// single_choice | text_input
    #[serde(rename = "type")]
    pub control_type: String,
    #[serde(default)]
    pub options: Option<Vec<UiOption>>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverseResponse {
    pub ai_message: String,
    pub ui_control: UiControl,
    #[serde(default)]
    pub conversation_state: Value,
    pub is_complete: bool,
    #[serde(default)]
    pub ready_for_blueprint: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintGenerationResponse {
    pub blueprint: Blueprint,
    pub ai_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelSectionResponse {
    pub section: NovelSection,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteNovelsResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingModelOption {
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub provider: Option<String>,
    pub temperature: f64,
    #[serde(default)]
    pub variants: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingModelOptionsResponse {
    pub enabled: bool,
    pub fallback_variants: u32,
    #[serde(default)]
    pub models: Vec<WritingModelOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSection {
    pub key: String,
    pub title: String,
    pub content: String,
    pub tokens: u32,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSnapshot {
    pub system_prompt: String,
    #[serde(default)]
    pub sections: Vec<PromptSection>,
    pub total_tokens: u32,
    #[serde(default)]
    pub prompt_input: Option<String>,
}

/// 章节生成参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateChapterOptions {
    /// 为空时由服务端使用默认模型集合
    pub model_keys: Option<Vec<String>>,
    pub error_strategy: ErrorStrategy,
    pub format_cleanup: Option<bool>,
}
