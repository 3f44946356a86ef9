//! 基础设施层
//!
//! 包含 PostgreSQL 仓储、事务实现、迁移与业务指标

pub mod observability;
pub mod persistence;
