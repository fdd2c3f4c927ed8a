//! Detection - AI 检测结果的缓存与状态机编排

mod store;

pub use store::{DetectionStore, RunTicket};
