//! Memory Layer - In-Memory State Management
//!
//! 实现检测结果缓存和认证会话的内存状态

mod auth_session;
mod detection_cache;

pub use auth_session::InMemoryAuthSession;
pub use detection_cache::InMemoryDetectionCache;
