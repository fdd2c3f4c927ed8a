//! Vector DTOs - 向量域请求/响应结构

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 章节向量化状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorChapterStatus {
    Ingested,
    Partial,
    Missing,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorProjectSummary {
    pub project_id: String,
    pub title: String,
    pub total_chapters: u32,
    pub ingested_chapters: u32,
    pub partial_chapters: u32,
    pub missing_chapters: u32,
    pub stale_chapters: u32,
    #[serde(default)]
    pub last_ingested_at: Option<String>,
    pub has_vectors: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorProjectListResponse {
    #[serde(default)]
    pub projects: Vec<VectorProjectSummary>,
    #[serde(default)]
    pub vector_db_size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorChapterSummary {
    pub chapter_number: u32,
    pub title: String,
    pub status: VectorChapterStatus,
    pub chunk_count: u32,
    pub summary_count: u32,
    #[serde(default)]
    pub last_ingested_at: Option<String>,
    pub confirmed: bool,
    pub needs_refresh: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub word_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorChapterTotals {
    pub total: u32,
    pub ingested: u32,
    pub partial: u32,
    pub missing: u32,
    pub stale: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorChapterListResponse {
    pub project_id: String,
    pub totals: VectorChapterTotals,
    #[serde(default)]
    pub chapters: Vec<VectorChapterSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorChunkDetail {
    pub chunk_index: u32,
    #[serde(default)]
    pub chapter_title: Option<String>,
    pub content: String,
    pub embedding_dim: u32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSummaryDetail {
    pub title: String,
    pub summary: String,
    pub embedding_dim: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorChapterDetailResponse {
    pub project_id: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub chunks: Vec<VectorChunkDetail>,
    #[serde(default)]
    pub summary: Option<VectorSummaryDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorOperationResult {
    pub processed: u32,
    pub skipped: u32,
    pub failed: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorRetrievalTestRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k_chunks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k_summaries: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRetrievalChunk {
    pub chapter_number: u32,
    #[serde(default)]
    pub chunk_index: Option<u32>,
    #[serde(default)]
    pub chapter_title: Option<String>,
    pub content: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRetrievalSummary {
    pub chapter_number: u32,
    pub title: String,
    pub summary: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRetrievalTestResponse {
    pub query: String,
    #[serde(default)]
    pub chunks: Vec<VectorRetrievalChunk>,
    #[serde(default)]
    pub summaries: Vec<VectorRetrievalSummary>,
}
