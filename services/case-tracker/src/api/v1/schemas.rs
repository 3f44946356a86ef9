//! 案例 API 的请求与响应模型
//!
//! 查询串里的标量一律按字符串接收再手工解析，解析失败统一走 422 校验错误，
//! 不依赖 extractor 自身的拒绝格式。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracker_common::{PagedResult, Pagination};
use tracker_errors::{AppError, AppResult};
use uuid::Uuid;

use crate::application::use_cases::{CreateCaseInput, CreateQueryInput};
use crate::domain::entities::{CaseQuery, SupportCase};
use crate::domain::repositories::{CaseFilter, CaseSort, SortField, SortOrder};
use crate::domain::value_objects::{CasePriority, CaseStatus, CaseType};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 50;

// =============================================================================
// 请求模型
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    pub title: String,
    pub description: Option<String>,
    pub case_type: String,
    pub priority: String,
    pub created_by: String,
    #[serde(default)]
    pub queries: Vec<CreateQueryRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQueryRequest {
    pub database_name: String,
    pub schema_name: String,
    pub query_text: String,
    pub execution_time_ms: Option<i64>,
    pub rows_affected: Option<i64>,
}

impl CreateCaseRequest {
    pub fn into_input(self) -> CreateCaseInput {
        CreateCaseInput {
            title: self.title,
            description: self.description,
            case_type: self.case_type,
            priority: self.priority,
            created_by: self.created_by,
            queries: self
                .queries
                .into_iter()
                .map(|query| CreateQueryInput {
                    database_name: query.database_name,
                    schema_name: query.schema_name,
                    query_text: query.query_text,
                    execution_time_ms: query.execution_time_ms,
                    rows_affected: query.rows_affected,
                })
                .collect(),
        }
    }
}

/// 列表查询参数，全部可选
#[derive(Debug, Default, Deserialize)]
pub struct ListCasesParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub case_type: Option<String>,
    pub created_by: Option<String>,
    pub search: Option<String>,
    pub date_gte: Option<String>,
    pub date_lte: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListCasesParams {
    /// 解析为筛选、排序与分页三元组
    ///
    /// 枚举与日期解析失败返回校验错误；排序参数无法识别时回退默认值。
    pub fn into_query(self) -> AppResult<(CaseFilter, CaseSort, Pagination)> {
        let page = match self.page.as_deref() {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| AppError::validation(format!("Invalid page: {}", raw)))?,
            None => DEFAULT_PAGE,
        };
        if page < 1 {
            return Err(AppError::validation("page must be at least 1"));
        }

        let page_size = match self.page_size.as_deref() {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| AppError::validation(format!("Invalid page_size: {}", raw)))?,
            None => DEFAULT_PAGE_SIZE,
        };
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::validation(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let status: Option<CaseStatus> = self.status.as_deref().map(str::parse).transpose()?;
        let priority: Option<CasePriority> =
            self.priority.as_deref().map(str::parse).transpose()?;
        let case_type: Option<CaseType> = self.case_type.as_deref().map(str::parse).transpose()?;

        let date_gte = self.date_gte.as_deref().map(parse_date_param).transpose()?;
        let date_lte = self.date_lte.as_deref().map(parse_date_param).transpose()?;

        let filter = CaseFilter {
            status,
            priority,
            case_type,
            // created_by 入库时统一小写，筛选值需对齐
            created_by: self.created_by.map(|email| email.to_lowercase()),
            search: self.search,
            date_gte,
            date_lte,
        };

        let sort = CaseSort {
            field: SortField::parse_or_default(self.sort_by.as_deref()),
            order: SortOrder::parse_or_default(self.sort_order.as_deref()),
        };

        Ok((filter, sort, Pagination::new(page, page_size)))
    }
}

/// 日期筛选同时接受 RFC 3339 时间戳与 `YYYY-MM-DD` 日期（按 UTC 零点解释）
fn parse_date_param(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| AppError::validation(format!("Invalid date filter: {}", raw)))
}

// =============================================================================
// 响应模型
// =============================================================================

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub database_name: String,
    pub schema_name: String,
    pub query_text: String,
    pub execution_time_ms: Option<i64>,
    pub rows_affected: Option<i64>,
    pub executed_by: String,
    pub executed_at: DateTime<Utc>,
}

impl QueryResponse {
    fn from_entity(query: CaseQuery) -> Self {
        Self {
            id: query.id.0,
            case_id: query.case_id.0,
            database_name: query.database_name,
            schema_name: query.schema_name,
            query_text: query.query_text,
            execution_time_ms: query.execution_time_ms,
            rows_affected: query.rows_affected,
            executed_by: query.executed_by.0,
            executed_at: query.executed_at,
        }
    }
}

/// 案例详情，含全部查询记录
#[derive(Debug, Serialize)]
pub struct CaseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub case_type: String,
    pub priority: String,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub queries: Vec<QueryResponse>,
}

impl CaseResponse {
    pub fn from_entity(case: SupportCase) -> Self {
        Self {
            id: case.id.0,
            title: case.title,
            description: case.description,
            case_type: case.case_type.as_str().to_string(),
            priority: case.priority.as_str().to_string(),
            status: case.status.as_str().to_string(),
            created_by: case.created_by.0,
            created_at: case.created_at,
            updated_at: case.updated_at,
            queries: case
                .queries
                .into_iter()
                .map(QueryResponse::from_entity)
                .collect(),
        }
    }
}

/// 列表项，只带查询记录条数
#[derive(Debug, Serialize)]
pub struct CaseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub case_type: String,
    pub priority: String,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub queries_count: i64,
}

impl CaseSummary {
    fn from_entity(case: SupportCase, queries_count: i64) -> Self {
        Self {
            id: case.id.0,
            title: case.title,
            description: case.description,
            case_type: case.case_type.as_str().to_string(),
            priority: case.priority.as_str().to_string(),
            status: case.status.as_str().to_string(),
            created_by: case.created_by.0,
            created_at: case.created_at,
            updated_at: case.updated_at,
            queries_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseListResponse {
    pub items: Vec<CaseSummary>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub pages: u32,
}

impl CaseListResponse {
    pub fn from_page(result: PagedResult<(SupportCase, i64)>) -> Self {
        let pages = result.total_pages();
        Self {
            items: result
                .items
                .into_iter()
                .map(|(case, queries_count)| CaseSummary::from_entity(case, queries_count))
                .collect(),
            total: result.total,
            page: result.page,
            page_size: result.page_size,
            pages,
        }
    }
}

// =============================================================================
// 测试
// =============================================================================
