//! 行模型与共用 SQL
//!
//! 池化仓储与事务仓储执行同一组语句、走同一套行映射，差异只在 Executor。

use sqlx::{Postgres, QueryBuilder};
use tracker_common::{CaseId, QueryId};
use uuid::Uuid;

use crate::domain::entities::{CaseQuery, SupportCase};
use crate::domain::value_objects::{CasePriority, CaseStatus, CaseType, Email};

pub(super) const INSERT_CASE: &str = "INSERT INTO support_cases \
    (id, title, description, case_type, priority, status, created_by, created_at, updated_at) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

pub(super) const SELECT_CASE_BY_ID: &str = "SELECT id, title, description, case_type, \
    priority, status, created_by, created_at, updated_at \
    FROM support_cases WHERE id = $1";

pub(super) const INSERT_QUERY: &str = "INSERT INTO case_queries \
    (id, case_id, database_name, schema_name, query_text, execution_time_ms, rows_affected, \
    executed_by, executed_at) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

pub(super) const SELECT_QUERIES_BY_CASE: &str = "SELECT id, case_id, database_name, \
    schema_name, query_text, execution_time_ms, rows_affected, executed_by, executed_at \
    FROM case_queries WHERE case_id = $1 ORDER BY executed_at ASC";

pub(super) const COUNT_QUERIES_BY_CASE: &str =
    "SELECT COUNT(*) FROM case_queries WHERE case_id = $1";

/// 数据库行结构
#[derive(sqlx::FromRow)]
pub(super) struct CaseRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    case_type: String,
    priority: String,
    status: String,
    created_by: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl CaseRow {
    /// 行转领域实体；枚举列和邮箱列重新解析，脏数据在此报错而不是带病传播
    pub(super) fn into_case(self) -> Result<SupportCase, String> {
        let case_type = self
            .case_type
            .parse::<CaseType>()
            .map_err(|e| format!("Invalid case_type in database for case {}: {}", self.id, e))?;
        let priority = self
            .priority
            .parse::<CasePriority>()
            .map_err(|e| format!("Invalid priority in database for case {}: {}", self.id, e))?;
        let status = self
            .status
            .parse::<CaseStatus>()
            .map_err(|e| format!("Invalid status in database for case {}: {}", self.id, e))?;
        let created_by = Email::new(self.created_by)
            .map_err(|e| format!("Invalid created_by in database for case {}: {}", self.id, e))?;

        Ok(SupportCase {
            id: CaseId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            case_type,
            priority,
            status,
            created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            // 查询记录按需单独加载
            queries: Vec::new(),
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct QueryRow {
    id: Uuid,
    case_id: Uuid,
    database_name: String,
    schema_name: String,
    query_text: String,
    execution_time_ms: Option<i64>,
    rows_affected: Option<i64>,
    executed_by: String,
    executed_at: chrono::DateTime<chrono::Utc>,
}

impl QueryRow {
    pub(super) fn into_query(self) -> Result<CaseQuery, String> {
        let executed_by = Email::new(self.executed_by).map_err(|e| {
            format!("Invalid executed_by in database for query {}: {}", self.id, e)
        })?;

        Ok(CaseQuery {
            id: QueryId::from_uuid(self.id),
            case_id: CaseId::from_uuid(self.case_id),
            database_name: self.database_name,
            schema_name: self.schema_name,
            query_text: self.query_text,
            execution_time_ms: self.execution_time_ms,
            rows_affected: self.rows_affected,
            executed_by,
            executed_at: self.executed_at,
        })
    }
}

/// 整批查询记录的多值 INSERT，单条语句落库
pub(super) fn insert_queries_builder(queries: &[CaseQuery]) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(
        "INSERT INTO case_queries (id, case_id, database_name, schema_name, query_text, \
         execution_time_ms, rows_affected, executed_by, executed_at) ",
    );

    builder.push_values(queries, |mut row, query| {
        row.push_bind(query.id.0)
            .push_bind(query.case_id.0)
            .push_bind(query.database_name.as_str())
            .push_bind(query.schema_name.as_str())
            .push_bind(query.query_text.as_str())
            .push_bind(query.execution_time_ms)
            .push_bind(query.rows_affected)
            .push_bind(query.executed_by.as_str())
            .push_bind(query.executed_at);
    });

    builder
}
