//! Novel Desk - 多模型小说章节生成后端的客户端核心
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Detection Context: (项目, 章节) 组合键、检测记录与状态机
//! - Progress Context: 多模型生成进度快照（只读）
//!
//! 应用层 (application/):
//! - Ports: HttpTransport、Credential、DetectionCache、Backend API
//! - DetectionStore: 检测结果缓存与 begin/commit/rollback 两阶段迁移
//! - SessionExpiryHandler: 会话失效后的登出与跳转
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 认证请求信封 + reqwest 传输
//! - Clients: 生成域 / 向量域资源客户端
//! - Memory: 检测缓存与认证会话的内存实现

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
