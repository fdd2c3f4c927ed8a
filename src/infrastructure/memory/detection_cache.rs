//! In-Memory Detection Cache Implementation

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::DetectionCachePort;
use crate::domain::{DetectionKey, DetectionRecord};

/// 内存检测缓存
///
/// 同一个键的写入在 DashMap 分片锁内完成，多线程运行时下单次写入仍是原子的
pub struct InMemoryDetectionCache {
    records: DashMap<DetectionKey, DetectionRecord>,
}

impl InMemoryDetectionCache {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryDetectionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// updated_at 对同一个键单调不减
fn next_stamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if prev > now => prev,
        _ => now,
    }
}

impl DetectionCachePort for InMemoryDetectionCache {
    fn get(&self, key: &DetectionKey) -> DetectionRecord {
        self.records
            .get(key)
            .map(|r| r.clone())
            .unwrap_or_else(DetectionRecord::idle)
    }

    fn set(&self, key: &DetectionKey, mut record: DetectionRecord) -> DetectionRecord {
        let mut entry = self.records.entry(key.clone()).or_default();
        record.updated_at = Some(next_stamp(entry.updated_at));
        *entry = record.clone();
        tracing::debug!(key = %key, status = record.status.as_str(), "Detection record written");
        record
    }

    fn transition(
        &self,
        key: &DetectionKey,
        update: &dyn Fn(&DetectionRecord) -> DetectionRecord,
    ) -> (DetectionRecord, DetectionRecord) {
        let mut entry = self.records.entry(key.clone()).or_default();
        let previous = entry.clone();
        let mut next = update(&previous);
        next.updated_at = Some(next_stamp(previous.updated_at));
        *entry = next.clone();
        tracing::debug!(
            key = %key,
            old_status = previous.status.as_str(),
            new_status = next.status.as_str(),
            "Detection record transitioned"
        );
        (previous, next)
    }
}
