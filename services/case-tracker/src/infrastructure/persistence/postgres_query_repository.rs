//! PostgreSQL 查询记录仓储

use async_trait::async_trait;
use sqlx::PgPool;
use tracker_common::CaseId;
use tracker_errors::{AppError, AppResult};

use super::rows::{
    insert_queries_builder, QueryRow, COUNT_QUERIES_BY_CASE, INSERT_QUERY, SELECT_QUERIES_BY_CASE,
};
use crate::domain::entities::CaseQuery;
use crate::domain::repositories::QueryRepository;

pub struct PostgresQueryRepository {
    pool: PgPool,
}

impl PostgresQueryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryRepository for PostgresQueryRepository {
    async fn save(&self, query: &CaseQuery) -> AppResult<()> {
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
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to save query record: {}", e)))?;

        Ok(())
    }

    async fn save_many(&self, queries: &[CaseQuery]) -> AppResult<()> {
        // 空批不碰连接
        if queries.is_empty() {
            return Ok(());
        }

        insert_queries_builder(queries)
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to save query records: {}", e)))?;

        Ok(())
    }

    async fn find_by_case_id(&self, case_id: &CaseId) -> AppResult<Vec<CaseQuery>> {
        let rows = sqlx::query_as::<_, QueryRow>(SELECT_QUERIES_BY_CASE)
            .bind(case_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load query records: {}", e)))?;

        rows.into_iter()
            .map(|row| row.into_query())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::database(e))
    }

    async fn count_by_case_id(&self, case_id: &CaseId) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as(COUNT_QUERIES_BY_CASE)
            .bind(case_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count query records: {}", e)))?;

        Ok(count.0)
    }
}
