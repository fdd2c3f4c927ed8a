//! Resource Clients - 基于请求信封的类型化资源操作
//!
//! 两个实例：生成域（项目、章节、检测）与向量域。均无状态、不缓存、不重试。

mod novel_client;
pub mod novel_dto;
mod vector_client;
pub mod vector_dto;

pub use novel_client::NovelClient;
pub use vector_client::VectorClient;
