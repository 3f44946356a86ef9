//! tracker-bootstrap - 统一服务启动骨架

mod runtime;

pub use runtime::*;
