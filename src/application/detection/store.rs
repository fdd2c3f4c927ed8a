//! Detection Store - 按 (项目, 章节) 跟踪检测生命周期
//!
//! 读、写、失效都以键为单位；检测执行分两阶段:
//! `begin` 捕获 previous 并写入 running，随后 `commit` 写入结果或 `rollback` 恢复 previous。
//! previous 由每次调用各自持有（在 `RunTicket` 中），重叠调用之间互不干扰，最后写入者生效。
//! 未结算就被丢弃的 `RunTicket` 视为一次失败，记录不会停留在 running。

use std::sync::Arc;

use crate::application::error::ClientError;
use crate::application::ports::{DetectionApiPort, DetectionCachePort, RunDetectionRequest};
use crate::domain::{DetectionKey, DetectionRecord, DetectionResult};

/// 调用方在检测完成前放弃执行时写入的错误信息
pub const DETECTION_CANCELLED: &str = "detection cancelled";

/// 一次检测执行的凭据
///
/// 持有开始时捕获的 previous 记录，只能被 commit 或 rollback 消费一次。
/// 未被消费就被丢弃（future 被取消、任务被 abort）时，按失败处理并恢复 previous。
#[must_use = "a run ticket must be committed or rolled back"]
pub struct RunTicket {
    key: DetectionKey,
    previous: DetectionRecord,
    settled: bool,
    cache: Arc<dyn DetectionCachePort>,
}

impl RunTicket {
    /// 开始执行前的记录
    pub fn previous(&self) -> &DetectionRecord {
        &self.previous
    }

    fn settle(&mut self) -> DetectionRecord {
        self.settled = true;
        std::mem::take(&mut self.previous)
    }
}

impl std::fmt::Debug for RunTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunTicket")
            .field("key", &self.key)
            .field("previous", &self.previous)
            .field("settled", &self.settled)
            .finish()
    }
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!(key = %self.key, "Detection run dropped before completion");
        let previous = self.settle();
        self.cache.set(
            &self.key,
            DetectionRecord::to_failed(previous, DETECTION_CANCELLED),
        );
    }
}

/// 检测结果存储
///
/// 由会话级上下文持有并注入到使用方，不使用全局单例
pub struct DetectionStore {
    cache: Arc<dyn DetectionCachePort>,
    api: Arc<dyn DetectionApiPort>,
}

impl DetectionStore {
    pub fn new(cache: Arc<dyn DetectionCachePort>, api: Arc<dyn DetectionApiPort>) -> Self {
        Self { cache, api }
    }

    /// 当前记录，未见过的键返回 idle 记录
    pub fn get(&self, key: &DetectionKey) -> DetectionRecord {
        self.cache.get(key)
    }

    /// 无条件覆盖
    pub fn set(&self, key: &DetectionKey, record: DetectionRecord) -> DetectionRecord {
        self.cache.set(key, record)
    }

    /// 上游内容变化后丢弃已知过期的结果
    pub fn invalidate(&self, key: &DetectionKey) -> DetectionRecord {
        tracing::debug!(key = %key, "Detection record invalidated");
        self.cache.invalidate(key)
    }

    /// 拉取最近一次检测结果
    ///
    /// 不经过 running：拉取已完成的结果不算一次检测
    pub async fn fetch_latest(&self, key: &DetectionKey) -> Result<DetectionRecord, ClientError> {
        let result = self.api.fetch_detection(key).await?;
        Ok(self.cache.set(key, DetectionRecord::from_result(result)))
    }

    /// 开始一次检测：捕获 previous，立即写入 running 并清除错误信息
    pub fn begin(&self, key: &DetectionKey) -> RunTicket {
        let (previous, _) = self.cache.transition(key, &|current| current.to_running());
        RunTicket {
            key: key.clone(),
            previous,
            settled: false,
            cache: self.cache.clone(),
        }
    }

    /// 检测成功：写入结果，status 缺省为 success
    pub fn commit(&self, mut ticket: RunTicket, result: DetectionResult) -> DetectionRecord {
        ticket.settle();
        self.cache.set(&ticket.key, DetectionRecord::from_result(result))
    }

    /// 检测失败：恢复本次调用捕获的 previous，只改 status 与 error_message
    pub fn rollback(&self, mut ticket: RunTicket, error: &ClientError) -> DetectionRecord {
        let previous = ticket.settle();
        self.cache
            .set(&ticket.key, DetectionRecord::to_failed(previous, error.to_string()))
    }

    /// 执行检测
    ///
    /// 失败时先写入 error 状态，再把同一个错误返回给调用方
    pub async fn run_detection(
        &self,
        key: &DetectionKey,
        text: Option<String>,
        timeout_seconds: Option<f64>,
    ) -> Result<DetectionRecord, ClientError> {
        let ticket = self.begin(key);
        tracing::debug!(
            key = %key,
            previous_status = ticket.previous().status.as_str(),
            "Detection run started"
        );

        let request = RunDetectionRequest::new(text, timeout_seconds);
        match self.api.run_detection(key, request).await {
            Ok(result) => {
                let record = self.commit(ticket, result);
                tracing::info!(
                    key = %key,
                    status = record.status.as_str(),
                    confidence = ?record.confidence,
                    segments = record.segments.len(),
                    "Detection run completed"
                );
                Ok(record)
            }
            Err(error) => {
                self.rollback(ticket, &error);
                tracing::warn!(key = %key, error = %error, "Detection run failed");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetectionStatus, ProjectId, Segment};
    use crate::infrastructure::memory::InMemoryDetectionCache;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    type Reply = Result<DetectionResult, ClientError>;

    /// 按调用顺序交出 oneshot 接收端的假检测服务，测试端决定何时、以何结果返回
    #[derive(Default)]
    struct ScriptedDetectionApi {
        latest: Mutex<Option<DetectionResult>>,
        pending: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        requests: Mutex<Vec<RunDetectionRequest>>,
    }

    impl ScriptedDetectionApi {
        fn expect_run(&self) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl DetectionApiPort for ScriptedDetectionApi {
        async fn fetch_detection(&self, _key: &DetectionKey) -> Result<DetectionResult, ClientError> {
            self.latest
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ClientError::request_failed(404, "暂无检测记录"))
        }

        async fn run_detection(
            &self,
            _key: &DetectionKey,
            request: RunDetectionRequest,
        ) -> Result<DetectionResult, ClientError> {
            self.requests.lock().unwrap().push(request);
            let rx = self
                .pending
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected detection run");
            rx.await.expect("reply sender dropped")
        }
    }

    fn key() -> DetectionKey {
        DetectionKey::new(ProjectId::new("P1").unwrap(), 3)
    }

    fn success(confidence: f64) -> DetectionResult {
        DetectionResult {
            status: Some(DetectionStatus::Success),
            confidence: Some(confidence),
            segments: vec![Segment {
                label: 1,
                text: "...".to_string(),
            }],
            text_hash: Some("text-hash".to_string()),
            content_hash: Some("content-hash".to_string()),
            ..Default::default()
        }
    }

    fn setup() -> (Arc<DetectionStore>, Arc<ScriptedDetectionApi>) {
        let api = Arc::new(ScriptedDetectionApi::default());
        let store = Arc::new(DetectionStore::new(
            InMemoryDetectionCache::new().arc(),
            api.clone(),
        ));
        (store, api)
    }

    /// 让出执行权直到记录进入 running
    async fn wait_until_running(store: &DetectionStore, key: &DetectionKey) {
        for _ in 0..100 {
            if store.get(key).is_running() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("record never reached running");
    }

    #[tokio::test]
    async fn test_detection_lifecycle_scenario() {
        let (store, api) = setup();
        let key = key();

        // 未见过的键
        let record = store.get(&key);
        assert_eq!(record.status, DetectionStatus::Idle);
        assert!(record.segments.is_empty());
        assert!(record.confidence.is_none());

        // 第一次检测：中途可观察到 running，完成后写入结果
        let reply = api.expect_run();
        let task = {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move { store.run_detection(&key, Some("text".into()), None).await })
        };
        wait_until_running(&store, &key).await;

        reply.send(Ok(success(0.87))).unwrap();
        let record = task.await.unwrap().unwrap();
        assert_eq!(record.status, DetectionStatus::Success);
        assert_eq!(record.confidence, Some(0.87));
        assert!(record.error_message.is_none());
        assert!(record.updated_at.is_some());
        assert_eq!(store.get(&key), record);

        // 第二次检测失败：保留上一次成功的字段
        let reply = api.expect_run();
        let task = {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move { store.run_detection(&key, None, Some(30.0)).await })
        };
        wait_until_running(&store, &key).await;
        assert_eq!(store.get(&key).confidence, Some(0.87));

        reply
            .send(Err(ClientError::NetworkFailure("timeout".to_string())))
            .unwrap();
        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err, ClientError::NetworkFailure("timeout".to_string()));

        let record = store.get(&key);
        assert_eq!(record.status, DetectionStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some("timeout"));
        assert_eq!(record.confidence, Some(0.87));
        assert_eq!(record.segments.len(), 1);
        assert_eq!(record.text_hash.as_deref(), Some("text-hash"));
        assert_eq!(record.content_hash.as_deref(), Some("content-hash"));

        // invalidate 回到 idle
        store.invalidate(&key);
        let record = store.get(&key);
        assert_eq!(record.status, DetectionStatus::Idle);
        assert!(record.confidence.is_none());
        assert!(record.segments.is_empty());
        assert!(record.error_message.is_none());

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests[0].text.as_deref(), Some("text"));
        assert_eq!(requests[1].timeout_seconds, Some(30.0));
    }

    #[tokio::test]
    async fn test_success_defaults_missing_status() {
        let (store, api) = setup();
        let reply = api.expect_run();
        reply
            .send(Ok(DetectionResult {
                confidence: Some(0.2),
                ..Default::default()
            }))
            .unwrap();

        let record = store.run_detection(&key(), None, None).await.unwrap();
        assert_eq!(record.status, DetectionStatus::Success);
    }

    #[tokio::test]
    async fn test_retry_from_error_clears_message_while_running() {
        let (store, api) = setup();
        let key = key();
        store.set(
            &key,
            DetectionRecord::to_failed(DetectionRecord::idle(), "boom"),
        );

        let reply = api.expect_run();
        let task = {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move { store.run_detection(&key, None, None).await })
        };
        wait_until_running(&store, &key).await;
        assert!(store.get(&key).error_message.is_none());

        reply.send(Ok(success(0.5))).unwrap();
        task.await.unwrap().unwrap();
        assert_eq!(store.get(&key).status, DetectionStatus::Success);
    }

    #[tokio::test]
    async fn test_overlapping_runs_restore_their_own_previous() {
        let (store, api) = setup();
        let key = key();
        store.set(&key, DetectionRecord::from_result(success(0.87)));

        // 第一次调用捕获 success 记录作为 previous
        let first = store.begin(&key);
        assert_eq!(first.previous().status, DetectionStatus::Success);

        // 第二次调用在第一次未结束时开始，捕获的是 running 记录
        let second = store.begin(&key);
        assert_eq!(second.previous().status, DetectionStatus::Running);
        assert_eq!(second.previous().confidence, Some(0.87));

        // 第二次先成功，第一次后失败：最后写入者生效，且恢复的是第一次自己的 previous
        store.commit(second, success(0.4));
        let record = store.rollback(first, &ClientError::request_failed(500, "busy"));
        assert_eq!(record.status, DetectionStatus::Error);
        assert_eq!(record.confidence, Some(0.87));
        assert_eq!(store.get(&key).error_message.as_deref(), Some("busy"));

        // 通过完整流程重叠时同样不会互相破坏
        let reply_a = api.expect_run();
        let reply_b = api.expect_run();
        let run = |store: Arc<DetectionStore>, key: DetectionKey| {
            tokio::spawn(async move { store.run_detection(&key, None, None).await })
        };
        let task_a = run(store.clone(), key.clone());
        wait_until_running(&store, &key).await;
        let task_b = run(store.clone(), key.clone());
        while api.requests.lock().unwrap().len() < 2 {
            tokio::task::yield_now().await;
        }

        reply_a.send(Ok(success(0.9))).unwrap();
        task_a.await.unwrap().unwrap();
        reply_b
            .send(Err(ClientError::request_failed(502, "bad gateway")))
            .unwrap();
        task_b.await.unwrap().unwrap_err();

        let record = store.get(&key);
        assert_eq!(record.status, DetectionStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some("bad gateway"));
    }

    #[tokio::test]
    async fn test_abandoned_run_does_not_stay_running() {
        let (store, api) = setup();
        let key = key();
        store.set(&key, DetectionRecord::from_result(success(0.87)));

        // 服务端始终不返回，调用方超时后放弃
        let _reply = api.expect_run();
        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            store.run_detection(&key, None, None),
        )
        .await;
        assert!(outcome.is_err());

        let record = store.get(&key);
        assert_eq!(record.status, DetectionStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some(DETECTION_CANCELLED));
        assert_eq!(record.confidence, Some(0.87));
    }

    #[tokio::test]
    async fn test_aborted_run_task_restores_previous() {
        let (store, api) = setup();
        let key = key();

        let _reply = api.expect_run();
        let task = {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move { store.run_detection(&key, None, None).await })
        };
        wait_until_running(&store, &key).await;

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let record = store.get(&key);
        assert_eq!(record.status, DetectionStatus::Error);
        assert_eq!(record.error_message.as_deref(), Some(DETECTION_CANCELLED));
        assert!(record.confidence.is_none());
    }

    #[tokio::test]
    async fn test_settled_ticket_does_not_overwrite_on_drop() {
        let (store, _api) = setup();
        let key = key();

        let ticket = store.begin(&key);
        let committed = store.commit(ticket, success(0.5));
        assert_eq!(store.get(&key), committed);

        let ticket = store.begin(&key);
        store.rollback(ticket, &ClientError::request_failed(500, "busy"));
        assert_eq!(store.get(&key).error_message.as_deref(), Some("busy"));
    }

    #[tokio::test]
    async fn test_session_expiry_during_run_is_recorded_and_rethrown() {
        let (store, api) = setup();
        api.expect_run().send(Err(ClientError::SessionExpired)).unwrap();

        let err = store.run_detection(&key(), None, None).await.unwrap_err();
        assert!(err.is_session_expired());
        let record = store.get(&key());
        assert_eq!(record.status, DetectionStatus::Error);
        assert_eq!(
            record.error_message.as_deref(),
            Some("session expired, please log in again")
        );
    }

    #[tokio::test]
    async fn test_fetch_latest_skips_running() {
        let (store, api) = setup();
        let key = key();
        *api.latest.lock().unwrap() = Some(DetectionResult {
            status: None,
            ..success(0.66)
        });

        let record = store.fetch_latest(&key).await.unwrap();
        assert_eq!(record.status, DetectionStatus::Success);
        assert_eq!(record.confidence, Some(0.66));
        assert!(api.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_latest_failure_leaves_record_untouched() {
        let (store, _api) = setup();
        let key = key();
        let before = store.set(&key, DetectionRecord::from_result(success(0.3)));

        let err = store.fetch_latest(&key).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(store.get(&key), before);
    }
}
