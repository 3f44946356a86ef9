//! PostgreSQL Unit of Work 实现
//!
//! 使用 SQLx Transaction 提供事务协调能力。未显式提交或回滚就被丢弃时，
//! Transaction 的 Drop 会回滚，半写入不会外泄。

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracker_errors::{AppError, AppResult};

use super::tx_repositories::{TxCaseRepository, TxQueryRepository};
use crate::domain::repositories::{CaseRepository, QueryRepository};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// PostgreSQL Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUnitOfWork::new(tx)))
    }
}

/// PostgreSQL Unit of Work 实现
///
/// 持有一个事务和相关的 Repository 实例，所有仓储操作都在同一个事务中执行。
pub struct PostgresUnitOfWork {
    /// 使用 Arc<Mutex> 包装 Transaction，使其可以被多个 Repository 共享
    tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,

    // 事务感知的 Repositories
    case_repo: TxCaseRepository,
    query_repo: TxQueryRepository,
}

impl PostgresUnitOfWork {
    fn new(tx: Transaction<'static, Postgres>) -> Self {
        let tx = Arc::new(Mutex::new(Some(tx)));

        Self {
            tx: tx.clone(),
            case_repo: TxCaseRepository::new(tx.clone()),
            query_repo: TxQueryRepository::new(tx),
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn cases(&self) -> &dyn CaseRepository {
        &self.case_repo
    }

    fn queries(&self) -> &dyn QueryRepository {
        &self.query_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))?;

        Ok(())
    }
}
