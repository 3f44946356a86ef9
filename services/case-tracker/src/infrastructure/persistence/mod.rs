//! 持久化实现

mod filter;
mod rows;

mod postgres_case_repository;
mod postgres_query_repository;
mod postgres_unit_of_work;
mod tx_repositories;

pub mod migrations;

pub use postgres_case_repository::*;
pub use postgres_query_repository::*;
pub use postgres_unit_of_work::*;
pub use tx_repositories::{TxCaseRepository, TxQueryRepository};
