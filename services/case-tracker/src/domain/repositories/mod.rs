//! 仓储接口

mod case_repository;
mod query_repository;

pub use case_repository::*;
pub use query_repository::*;
