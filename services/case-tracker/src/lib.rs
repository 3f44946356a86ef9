//! Case Tracker Service Library
//!
//! 分层架构：
//! - `domain`: 领域层（案例与查询记录、值对象、仓储与 Unit of Work 契约）
//! - `application`: 应用层（用例编排）
//! - `infrastructure`: 基础设施层（PostgreSQL 仓储、迁移、业务指标）
//! - `api`: HTTP 接口层（axum 路由与请求响应模型）

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
