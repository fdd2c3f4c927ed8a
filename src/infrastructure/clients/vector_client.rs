//! Vector Client - 向量域资源客户端
//!
//! 后端 API（相对 `<base>/api/vector`）:
//! - GET  /projects
//! - GET  /projects/{id}/chapters
//! - GET  /projects/{id}/chapters/{n}
//! - POST /projects/{id}/chapters/reingest
//! - POST /projects/{id}/chapters/delete
//! - POST /projects/{id}/retrieval-test

use serde::Serialize;

use super::vector_dto::*;
use crate::application::error::ClientError;
use crate::domain::ProjectId;
use crate::infrastructure::http::{EnvelopeRequest, RequestEnvelope};

#[derive(Debug, Serialize)]
struct ChapterNumbersRequest<'a> {
    chapter_numbers: &'a [u32],
}

/// 向量域客户端
pub struct VectorClient {
    envelope: RequestEnvelope,
}

impl VectorClient {
    /// `envelope` 的 base_url 应指向 `<backend>/api/vector`
    pub fn new(envelope: RequestEnvelope) -> Self {
        Self { envelope }
    }

    fn project_path(project_id: &ProjectId) -> String {
        format!("/projects/{}", project_id)
    }

    pub async fn list_projects(&self) -> Result<VectorProjectListResponse, ClientError> {
        self.envelope.send_json(EnvelopeRequest::get("/projects")).await
    }

    pub async fn list_chapters(
        &self,
        project_id: &ProjectId,
    ) -> Result<VectorChapterListResponse, ClientError> {
        let path = format!("{}/chapters", Self::project_path(project_id));
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    pub async fn get_chapter_detail(
        &self,
        project_id: &ProjectId,
        chapter_number: u32,
    ) -> Result<VectorChapterDetailResponse, ClientError> {
        let path = format!("{}/chapters/{}", Self::project_path(project_id), chapter_number);
        self.envelope.send_json(EnvelopeRequest::get(path)).await
    }

    pub async fn reingest(
        &self,
        project_id: &ProjectId,
        chapter_numbers: &[u32],
    ) -> Result<VectorOperationResult, ClientError> {
        let path = format!("{}/chapters/reingest", Self::project_path(project_id));
        let request =
            EnvelopeRequest::post(path).json(&ChapterNumbersRequest { chapter_numbers })?;
        let result: VectorOperationResult = self.envelope.send_json(request).await?;
        tracing::info!(
            project_id = %project_id,
            processed = result.processed,
            skipped = result.skipped,
            failed = result.failed,
            "Vector reingest finished"
        );
        Ok(result)
    }

    pub async fn delete(
        &self,
        project_id: &ProjectId,
        chapter_numbers: &[u32],
    ) -> Result<VectorOperationResult, ClientError> {
        let path = format!("{}/chapters/delete", Self::project_path(project_id));
        let request =
            EnvelopeRequest::post(path).json(&ChapterNumbersRequest { chapter_numbers })?;
        self.envelope.send_json(request).await
    }

    pub async fn test_retrieval(
        &self,
        project_id: &ProjectId,
        request: &VectorRetrievalTestRequest,
    ) -> Result<VectorRetrievalTestResponse, ClientError> {
        let path = format!("{}/retrieval-test", Self::project_path(project_id));
        let request = EnvelopeRequest::post(path).json(request)?;
        self.envelope.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::testing::{envelope, FakeTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (VectorClient, Arc<FakeTransport>) {
        let (envelope, transport) = envelope("http://127.0.0.1:8000/api/vector", None);
        (VectorClient::new(envelope), transport)
    }

    fn project() -> ProjectId {
        ProjectId::new("P1").unwrap()
    }

    #[tokio::test]
    async fn test_list_projects() {
        let (client, transport) = client();
        transport.reply(
            200,
            r#"{"projects":[{"project_id":"P1","title":"T","total_chapters":3,
                "ingested_chapters":1,"partial_chapters":0,"missing_chapters":1,
                "stale_chapters":1,"has_vectors":true}],"vector_db_size_bytes":2048}"#,
        );

        let response = client.list_projects().await.unwrap();
        assert_eq!(response.projects.len(), 1);
        assert_eq!(response.vector_db_size_bytes, Some(2048));
        assert_eq!(
            transport.last_request().url,
            "http://127.0.0.1:8000/api/vector/projects"
        );
    }

    #[tokio::test]
    async fn test_reingest_payload() {
        let (client, transport) = client();
        transport.reply(200, r#"{"processed":2,"skipped":1,"failed":0}"#);

        let result = client.reingest(&project(), &[1, 2, 3]).await.unwrap();
        assert_eq!(result.processed, 2);
        assert_eq!(
            transport.last_request().url,
            "http://127.0.0.1:8000/api/vector/projects/P1/chapters/reingest"
        );
        assert_eq!(transport.last_body(), json!({"chapter_numbers": [1, 2, 3]}));
    }

    #[tokio::test]
    async fn test_retrieval_omits_unset_limits() {
        let (client, transport) = client();
        transport.reply(200, r#"{"query":"雨夜","chunks":[],"summaries":[]}"#);

        let request = VectorRetrievalTestRequest {
            query: "雨夜".to_string(),
            top_k_chunks: Some(5),
            top_k_summaries: None,
        };
        let response = client.test_retrieval(&project(), &request).await.unwrap();
        assert_eq!(response.query, "雨夜");
        assert_eq!(transport.last_body(), json!({"query": "雨夜", "top_k_chunks": 5}));
    }

    #[tokio::test]
    async fn test_chapter_status_decoding() {
        let (client, transport) = client();
        transport.reply(
            200,
            r#"{"project_id":"P1","totals":{"total":1,"ingested":0,"partial":0,"missing":0,"stale":1},
                "chapters":[{"chapter_number":1,"title":"一","status":"stale","chunk_count":4,
                "summary_count":1,"confirmed":true,"needs_refresh":true}]}"#,
        );

        let response = client.list_chapters(&project()).await.unwrap();
        assert_eq!(response.chapters[0].status, VectorChapterStatus::Stale);
        assert!(response.chapters[0].needs_refresh);
    }
}
