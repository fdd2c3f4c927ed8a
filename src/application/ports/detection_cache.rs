//! Detection Cache Port - 按 (项目, 章节) 寻址的检测结果缓存
//!
//! 具体实现在 infrastructure/memory 层

use crate::domain::{DetectionKey, DetectionRecord};

/// Detection Cache Port
///
/// 每个键同一时刻只有一条记录；读不产生写；每次写入整体替换并刷新 updated_at。
/// 实现必须保证单次 `set` / `transition` 对同一个键是原子的。
pub trait DetectionCachePort: Send + Sync {
    /// 获取记录，未见过的键返回 idle 记录（不写入）
    fn get(&self, key: &DetectionKey) -> DetectionRecord;

    /// 无条件覆盖，返回带 updated_at 的已写入记录
    fn set(&self, key: &DetectionKey, record: DetectionRecord) -> DetectionRecord;

    /// 原子的读-改-写，返回 (旧记录, 已写入的新记录)
    fn transition(
        &self,
        key: &DetectionKey,
        update: &dyn Fn(&DetectionRecord) -> DetectionRecord,
    ) -> (DetectionRecord, DetectionRecord);

    /// 重置为 idle，丢弃置信度、分段、哈希和错误信息
    fn invalidate(&self, key: &DetectionKey) -> DetectionRecord {
        self.set(key, DetectionRecord::idle())
    }
}
