//! Progress Context - 多模型生成进度
//!
//! 后端上报的只读快照。这里只负责解码校验和原样暴露，
//! 诸如"是否仍有模型在生成"之类的派生判断由调用方自行计算。

mod snapshot;

pub use snapshot::{ModelProgress, ModelStatus, ProgressError, ProgressSnapshot};
