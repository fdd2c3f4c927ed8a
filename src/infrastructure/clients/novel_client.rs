//! Novel Client - 生成域资源客户端
//!
//! 项目、章节、蓝图、多模型章节生成与 AI 检测接口。
//! 每个操作都是一次经过请求信封的调用，不缓存、不重试。
//!
//! 后端 API（相对 `<base>/api`）:
//! - `/novels/...`            项目与蓝图
//! - `/writer/novels/...`     章节生成、评审、选版、进度、停止
//! - `/detection/novels/...`  AI 检测

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::novel_dto::*;
use crate::application::error::ClientError;
use crate::application::ports::{DetectionApiPort, GenerationApiPort, RunDetectionRequest};
use crate::domain::{DetectionKey, DetectionResult, ProgressSnapshot, ProjectId};
use crate::infrastructure::http::{EnvelopeRequest, RequestEnvelope};

#[derive(Debug, Serialize)]
struct CreateNovelRequest<'a> {
    title: &'a str,
    initial_prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct ConverseRequest {
    user_input: Value,
    conversation_state: Value,
}

#[derive(Debug, Serialize)]
struct GenerateChapterRequest<'a> {
    chapter_number: u32,
    error_strategy: ErrorStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_keys: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format_cleanup: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ChapterNumberRequest {
    chapter_number: u32,
}

#[derive(Debug, Serialize)]
struct SelectVersionRequest {
    chapter_number: u32,
    version_index: u32,
}

#[derive(Debug, Serialize)]
struct ChapterNumbersRequest<'a> {
    chapter_numbers: &'a [u32],
}

#[derive(Debug, Serialize)]
struct GenerateOutlineRequest {
    start_chapter: u32,
    num_chapters: u32,
}

#[derive(Debug, Serialize)]
struct EditChapterRequest<'a> {
    chapter_number: u32,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct StopModelRequest<'a> {
    model_key: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateVariantsRequest<'a> {
    model_key: &'a str,
    variants: u32,
}

/// 生成域客户端
pub struct NovelClient {
    envelope: RequestEnvelope,
}

impl NovelClient {
    /// `envelope` 的 base_url 应指向 `<backend>/api`
    pub fn new(envelope: RequestEnvelope) -> Self {
        Self { envelope }
    }

    fn novel_path(project_id: &ProjectId) -> String {
        format!("/novels/{}", project_id)
    }

    fn writer_path(project_id: &ProjectId) -> String {
        format!("/writer/novels/{}", project_id)
    }

    fn detection_path(key: &DetectionKey) -> String {
        format!(
            "/detection/novels/{}/chapters/{}",
            key.project_id, key.chapter_number
        )
    }

    // ------------------------------------------------------------------
    // 项目
    // ------------------------------------------------------------------

    pub async fn list_novels(&self) -> Result<Vec<NovelProjectSummary>, ClientError> {
        self.envelope.send_json(EnvelopeRequest::get("/novels")).await
    }

    pub async fn create_novel(
        &self,
        title: &str,
        initial_prompt: &str,
    ) -> Result<NovelProject, ClientError> {
        let request = EnvelopeRequest::post("/novels").json(&CreateNovelRequest {
            title,
            initial_prompt,
        })?;
        self.envelope.send_json(request).await
    }

    pub async fn get_novel(&self, project_id: &ProjectId) -> Result<NovelProject, ClientError> {
        self.envelope
            .send_json(EnvelopeRequest::get(Self::novel_path(project_id)))
            .await
    }

    pub async fn delete_novels(
        &self,
        project_ids: &[ProjectId],
    ) -> Result<DeleteNovelsResponse, ClientError> {
        let request = EnvelopeRequest::delete("/novels").json(project_ids)?;
        self.envelope.send_json(request).await
    }

    pub async fn get_chapter(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
    ) -> Result<Chapter, ClientError> {
        let path = format!("{}/chapters/{}", Self::novel_path(project_id), chapter_number);
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    pub async fn get_section(
        &self,
        project_id: &ProjectId,
        section: NovelSection,
    ) -> Result<NovelSectionResponse, ClientError> {
        let path = format!("{}/sections/{}", Self::novel_path(project_id), section.as_str());
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    /// 概念对话，user_input 缺省时发送 `{"id": null, "value": null}`
    pub async fn converse_concept(
        &self,
        project_id: &ProjectId,
        user_input: Option<Value>,
        conversation_state: Option<Value>,
    ) -> Result<ConverseResponse, ClientError> {
        let path = format!("{}/concept/converse", Self::novel_path(project_id));
        let request = EnvelopeRequest::post(path).json(&ConverseRequest {
            user_input: user_input.unwrap_or_else(|| json!({"id": null, "value": null})),
            conversation_state: conversation_state.unwrap_or_else(|| json!({})),
        })?;
        self.envelope.send_json(request).await
    }

    // ------------------------------------------------------------------
    // 蓝图
    // ------------------------------------------------------------------

    pub async fn generate_blueprint(
        &self,
        project_id: &ProjectId,
    ) -> Result<BlueprintGenerationResponse, ClientError> {
        let path = format!("{}/blueprint/generate", Self::novel_path(project_id));
        self.envelope.send_json(EnvelopeRequest::post(path)).await
    }

    pub async fn save_blueprint(
        &self,
        project_id: &ProjectId,
        blueprint: &Blueprint,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/blueprint/save", Self::novel_path(project_id));
        let request = EnvelopeRequest::post(path).json(blueprint)?;
        self.envelope.send_json(request).await
    }

    /// 局部更新蓝图字段
    pub async fn update_blueprint(
        &self,
        project_id: &ProjectId,
        fields: &Map<String, Value>,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/blueprint", Self::novel_path(project_id));
        let request = EnvelopeRequest::patch(path).json(fields)?;
        self.envelope.send_json(request).await
    }

    // ------------------------------------------------------------------
    // 章节生成
    // ------------------------------------------------------------------

    pub async fn generate_chapter(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
        options: &GenerateChapterOptions,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/chapters/generate", Self::writer_path(project_id));
        let request = EnvelopeRequest::post(path).json(&GenerateChapterRequest {
            chapter_number,
            error_strategy: options.error_strategy,
            model_keys: options.model_keys.as_deref(),
            format_cleanup: options.format_cleanup,
        })?;
        self.envelope.send_json(request).await
    }

    pub async fn evaluate_chapter(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/chapters/evaluate", Self::writer_path(project_id));
        let request = EnvelopeRequest::post(path).json(&ChapterNumberRequest { chapter_number })?;
        self.envelope.send_json(request).await
    }

    pub async fn select_chapter_version(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
        version_index: u32,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/chapters/select", Self::writer_path(project_id));
        let request = EnvelopeRequest::post(path).json(&SelectVersionRequest {
            chapter_number,
            version_index,
        })?;
        self.envelope.send_json(request).await
    }

    pub async fn update_chapter_outline(
        &self,
        project_id: &ProjectId,
        outline: &ChapterOutline,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/chapters/update-outline", Self::writer_path(project_id));
        let request = EnvelopeRequest::post(path).json(outline)?;
        self.envelope.send_json(request).await
    }

    pub async fn delete_chapters(
        &self,
        project_id: &ProjectId,
        chapter_numbers: &[u32],
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/chapters/delete", Self::writer_path(project_id));
        let request =
            EnvelopeRequest::post(path).json(&ChapterNumbersRequest { chapter_numbers })?;
        self.envelope.send_json(request).await
    }

    pub async fn generate_chapter_outline(
        &self,
        project_id: &ProjectId,
        start_chapter: u32,
        num_chapters: u32,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/chapters/outline", Self::writer_path(project_id));
        let request = EnvelopeRequest::post(path).json(&GenerateOutlineRequest {
            start_chapter,
            num_chapters,
        })?;
        self.envelope.send_json(request).await
    }

    pub async fn edit_chapter_content(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
        content: &str,
    ) -> Result<NovelProject, ClientError> {
        let path = format!("{}/chapters/edit", Self::writer_path(project_id));
        let request = EnvelopeRequest::post(path).json(&EditChapterRequest {
            chapter_number,
            content,
        })?;
        self.envelope.send_json(request).await
    }

    pub async fn get_prompt_snapshot(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
    ) -> Result<PromptSnapshot, ClientError> {
        let path = format!(
            "{}/chapters/{}/prompt-snapshot",
            Self::writer_path(project_id),
            chapter_number
        );
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    pub async fn get_prompt_preview(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
    ) -> Result<PromptSnapshot, ClientError> {
        let path = format!(
            "{}/chapters/{}/prompt-preview",
            Self::writer_path(project_id),
            chapter_number
        );
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    // ------------------------------------------------------------------
    // 写作模型
    // ------------------------------------------------------------------

    pub async fn get_writing_model_options(
        &self,
    ) -> Result<WritingModelOptionsResponse, ClientError> {
        self.envelope
            .send_json(EnvelopeRequest::get("/writer/writing-models/options"))
            .await
    }

    pub async fn update_writing_model_variants(
        &self,
        model_key: &str,
        variants: u32,
    ) -> Result<WritingModelOptionsResponse, ClientError> {
        let request = EnvelopeRequest::post("/writer/writing-models/variants")
            .json(&UpdateVariantsRequest {
                model_key,
                variants,
            })?;
        self.envelope.send_json(request).await
    }
}

#[async_trait]
impl DetectionApiPort for NovelClient {
    async fn fetch_detection(&self, key: &DetectionKey) -> Result<DetectionResult, ClientError> {
        let path = format!("{}/latest", Self::detection_path(key));
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    async fn run_detection(
        &self,
        key: &DetectionKey,
        request: RunDetectionRequest,
    ) -> Result<DetectionResult, ClientError> {
        let path = format!("{}/ai-detect", Self::detection_path(key));
        let request = EnvelopeRequest::post(path).json(&request)?;
        self.envelope.send_json(request).await
    }
}

#[async_trait]
impl GenerationApiPort for NovelClient {
    async fn fetch_generation_progress(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
    ) -> Result<ProgressSnapshot, ClientError> {
        let path = format!(
            "{}/chapters/{}/generation-progress",
            Self::writer_path(project_id),
            chapter_number
        );
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    async fn stop_model_generation(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
        model_key: &str,
    ) -> Result<(), ClientError> {
        let path = format!(
            "{}/chapters/{}/stop",
            Self::writer_path(project_id),
            chapter_number
        );
        let request = EnvelopeRequest::post(path).json(&StopModelRequest { model_key })?;
        self.envelope.send_unit(request).await?;
        tracing::info!(
            project_id = %project_id,
            chapter_number = chapter_number,
            model_key = %model_key,
            "Stop requested for model generation"
        );
        Ok(())
    }
}
