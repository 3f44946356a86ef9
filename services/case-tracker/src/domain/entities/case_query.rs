//! 查询执行记录实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_common::{CaseId, QueryId};

use crate::domain::value_objects::Email;
use crate::error::DomainError;

/// 查询执行记录
///
/// 记录处理案例过程中执行的一条 SQL：目标库/模式、语句文本，
/// 以及可选的耗时与行数遥测。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseQuery {
    pub id: QueryId,
    pub case_id: CaseId,
    pub database_name: String,
    pub schema_name: String,
    pub query_text: String,
    pub execution_time_ms: Option<i64>,
    pub rows_affected: Option<i64>,
    pub executed_by: Email,
    pub executed_at: DateTime<Utc>,
}

impl CaseQuery {
    /// 创建新的查询记录，文本字段去除首尾空白后必须非空
    pub fn create(
        case_id: CaseId,
        database_name: String,
        schema_name: String,
        query_text: String,
        executed_by: Email,
        execution_time_ms: Option<i64>,
        rows_affected: Option<i64>,
    ) -> Result<Self, DomainError> {
        let database_name = database_name.trim().to_string();
        if database_name.is_empty() {
            return Err(DomainError::EmptyDatabaseName);
        }

        let schema_name = schema_name.trim().to_string();
        if schema_name.is_empty() {
            return Err(DomainError::EmptySchemaName);
        }

        let query_text = query_text.trim().to_string();
        if query_text.is_empty() {
            return Err(DomainError::EmptyQueryText);
        }

        Ok(Self {
            id: QueryId::new(),
            case_id,
            database_name,
            schema_name,
            query_text,
            execution_time_ms,
            rows_affected,
            executed_by,
            executed_at: Utc::now(),
        })
    }
}
