//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod clients;
pub mod http;
pub mod memory;
mod state;

pub use clients::{NovelClient, VectorClient};
pub use http::{EnvelopeRequest, ReqwestTransport, ReqwestTransportConfig, RequestEnvelope};
pub use memory::{InMemoryAuthSession, InMemoryDetectionCache};
pub use state::DeskState;
