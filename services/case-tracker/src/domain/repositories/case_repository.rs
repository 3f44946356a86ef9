//! 案例仓储接口

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracker_common::{CaseId, Pagination};
use tracker_errors::AppResult;

use crate::domain::entities::SupportCase;
use crate::domain::value_objects::{CasePriority, CaseStatus, CaseType};

/// 动态筛选条件
///
/// 所有字段可选，未提供的字段不参与谓词。
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub priority: Option<CasePriority>,
    pub case_type: Option<CaseType>,
    pub created_by: Option<String>,
    /// 对 title 与 description 做不区分大小写的子串匹配
    pub search: Option<String>,
    pub date_gte: Option<DateTime<Utc>>,
    pub date_lte: Option<DateTime<Utc>>,
}

/// 可排序字段
///
/// 封闭集合，ORDER BY 的列名只从这里产生，从不取自原始输入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Status,
    Priority,
    CaseType,
    CreatedBy,
    #[default]
    CreatedAt,
    Title,
}

impl SortField {
    /// 未识别或缺失的输入静默回落到 created_at
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("status") => Self::Status,
            Some("priority") => Self::Priority,
            Some("case_type") => Self::CaseType,
            Some("created_by") => Self::CreatedBy,
            Some("created_at") => Self::CreatedAt,
            Some("title") => Self::Title,
            _ => Self::CreatedAt,
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// 未识别或缺失的输入静默回落到 desc
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("asc") => Self::Asc,
            Some("desc") => Self::Desc,
            _ => Self::Desc,
        }
    }
}

/// 排序规则
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseSort {
    pub field: SortField,
    pub order: SortOrder,
}

/// 案例仓储
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// 插入案例行，不含其查询记录
    async fn save(&self, case: &SupportCase) -> AppResult<()>;

    /// 按 ID 查找，未命中返回 None；返回值的 queries 为空
    async fn find_by_id(&self, id: &CaseId) -> AppResult<Option<SupportCase>>;

    /// 按条件分页查询，返回当页数据与同条件下的总行数
    async fn find_all(
        &self,
        filter: &CaseFilter,
        sort: &CaseSort,
        pagination: &Pagination,
    ) -> AppResult<(Vec<SupportCase>, i64)>;
}
