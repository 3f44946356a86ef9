//! PostgreSQL 案例仓储

use async_trait::async_trait;
use sqlx::PgPool;
use tracker_common::{CaseId, Pagination};
use tracker_errors::{AppError, AppResult};

use super::filter::{apply_filter_binds, build_count_sql, build_page_sql, FilterBind};
use super::rows::{CaseRow, INSERT_CASE, SELECT_CASE_BY_ID};
use crate::domain::entities::SupportCase;
use crate::domain::repositories::{CaseFilter, CaseRepository, CaseSort};

pub struct PostgresCaseRepository {
    pool: PgPool,
}

impl PostgresCaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseRepository for PostgresCaseRepository {
    async fn save(&self, case: &SupportCase) -> AppResult<()> {
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
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to save case: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &CaseId) -> AppResult<Option<SupportCase>> {
        let row = sqlx::query_as::<_, CaseRow>(SELECT_CASE_BY_ID)
            .bind(id.0)
            .fetch_optional(&self.pool)
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
        let (count_sql, count_binds) = build_count_sql(filter);
        let total: (i64,) = apply_filter_binds!(sqlx::query_as(&count_sql), count_binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count cases: {}", e)))?;

        let (page_sql, page_binds) = build_page_sql(filter, sort);
        let rows = apply_filter_binds!(sqlx::query_as::<_, CaseRow>(&page_sql), page_binds)
            .bind(pagination.page_size as i64)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
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
