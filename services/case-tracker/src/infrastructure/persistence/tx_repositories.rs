//! 事务感知的 Repository 实现
//!
//! 这些 Repository 使用共享的 Transaction 而非 PgPool。

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracker_common::{CaseId, Pagination};
use tracker_errors::{AppError, AppResult};

use super::filter::{apply_filter_binds, build_count_sql, build_page_sql, FilterBind};
use super::rows::{
    insert_queries_builder, CaseRow, QueryRow, COUNT_QUERIES_BY_CASE, INSERT_CASE, INSERT_QUERY,
    SELECT_CASE_BY_ID, SELECT_QUERIES_BY_CASE,
};
use crate::domain::entities::{CaseQuery, SupportCase};
use crate::domain::repositories::{CaseFilter, CaseRepository, CaseSort, QueryRepository};

/// 共享事务类型
pub(super) type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// 宏：定义一个简单的 TxRepository 结构体
macro_rules! define_tx_repo {
    ($name:ident) => {
        pub struct $name {
            tx: SharedTx,
        }

        impl $name {
            pub(super) fn new(tx: SharedTx) -> Self {
                Self { tx }
            }
        }
    };
}

define_tx_repo!(TxCaseRepository);
define_tx_repo!(TxQueryRepository);

// =============================================================================
// CaseRepository 实现
// =============================================================================

#[async_trait]
impl CaseRepository for TxCaseRepository {
    async fn save(&self, case: &SupportCase) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(INSERT_CASE)
            .bind(case.id.0)
            .bind(&case.title)
            .bind(&case.description)
            .bind(case.case_type.as_str())
            .bind(case.priority.as_str())
            .bind(case.status.as_str())
            .bind(case.created_by.as_str())
            .bind(case.created_at)
            .bind(case.updated_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to save case: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &CaseId) -> AppResult<Option<SupportCase>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row = sqlx::query_as::<_, CaseRow>(SELECT_CASE_BY_ID)
            .bind(id.0)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to find case: {}", e)))?;

        match row {
            Some(row) => {
                let case = row.into_case().map_err(|e| AppError::database(e))?;
                Ok(Some(case))
            }
            None => Ok(None),
        }
    }

    async fn find_all(
        &self,
        filter: &CaseFilter,
        sort: &CaseSort,
        pagination: &Pagination,
    ) -> AppResult<(Vec<SupportCase>, i64)> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let (count_sql, count_binds) = build_count_sql(filter);
        let total: (i64,) = apply_filter_binds!(sqlx::query_as(&count_sql), count_binds)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to count cases: {}", e)))?;

        let (page_sql, page_binds) = build_page_sql(filter, sort);
        let rows = apply_filter_binds!(sqlx::query_as::<_, CaseRow>(&page_sql), page_binds)
            .bind(pagination.page_size as i64)
            .bind(pagination.offset())
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to list cases: {}", e)))?;

        let cases = rows
            .into_iter()
            .map(|row| row.into_case())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::database(e))?;

        Ok((cases, total.0))
    }
}

// =============================================================================
// QueryRepository 实现
// =============================================================================

#[async_trait]
impl QueryRepository for TxQueryRepository {
    async fn save(&self, query: &CaseQuery) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(INSERT_QUERY)
            .bind(query.id.0)
            .bind(query.case_id.0)
            .bind(&query.database_name)
            .bind(&query.schema_name)
            .bind(&query.query_text)
            .bind(query.execution_time_ms)
            .bind(query.rows_affected)
            .bind(query.executed_by.as_str())
            .bind(query.executed_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to save query record: {}", e)))?;

        Ok(())
    }

    async fn save_many(&self, queries: &[CaseQuery]) -> AppResult<()> {
        if queries.is_empty() {
            return Ok(());
        }

        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        insert_queries_builder(queries)
            .build()
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to save query records: {}", e)))?;

        Ok(())
    }

    async fn find_by_case_id(&self, case_id: &CaseId) -> AppResult<Vec<CaseQuery>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let rows = sqlx::query_as::<_, QueryRow>(SELECT_QUERIES_BY_CASE)
            .bind(case_id.0)
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to load query records: {}", e)))?;

        rows.into_iter()
            .map(|row| row.into_query())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::database(e))
    }

    async fn count_by_case_id(&self, case_id: &CaseId) -> AppResult<i64> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let count: (i64,) = sqlx::query_as(COUNT_QUERIES_BY_CASE)
            .bind(case_id.0)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to count query records: {}", e)))?;

        Ok(count.0)
    }
}
