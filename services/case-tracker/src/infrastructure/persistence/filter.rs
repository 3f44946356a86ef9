//! 动态筛选 SQL 组装
//!
//! 谓词片段与绑定值同步生成，占位符编号即绑定列表当前长度。
//! 页查询与 COUNT 查询共用同一 WHERE 子句和绑定序，两侧计数不会错位。

use chrono::{DateTime, Utc};

use crate::domain::repositories::{CaseFilter, CaseSort, SortField, SortOrder};

/// 筛选绑定值
#[derive(Debug, Clone, PartialEq)]
pub(super) enum FilterBind {
    Text(String),
    Time(DateTime<Utc>),
}

const CASE_COLUMNS: &str =
    "id, title, description, case_type, priority, status, created_by, created_at, updated_at";

/// 构建 WHERE 子句与绑定列表
///
/// 子句带前导空格；没有任何条件时返回空串。
pub(super) fn build_where(filter: &CaseFilter) -> (String, Vec<FilterBind>) {
    let mut fragments: Vec<String> = Vec::new();
    let mut binds: Vec<FilterBind> = Vec::new();

    if let Some(status) = &filter.status {
        binds.push(FilterBind::Text(status.as_str().to_string()));
        fragments.push(format!("status = ${}", binds.len()));
    }

    if let Some(priority) = &filter.priority {
        binds.push(FilterBind::Text(priority.as_str().to_string()));
        fragments.push(format!("priority = ${}", binds.len()));
    }

    if let Some(case_type) = &filter.case_type {
        binds.push(FilterBind::Text(case_type.as_str().to_string()));
        fragments.push(format!("case_type = ${}", binds.len()));
    }

    if let Some(created_by) = &filter.created_by {
        binds.push(FilterBind::Text(created_by.clone()));
        fragments.push(format!("created_by = ${}", binds.len()));
    }

    if let Some(search) = &filter.search {
        // 模式绑定一次，两个 ILIKE 引用同一个占位符
        binds.push(FilterBind::Text(format!("%{}%", search)));
        let index = binds.len();
        fragments.push(format!(
            "(title ILIKE ${index} OR description ILIKE ${index})"
        ));
    }

    if let Some(date_gte) = filter.date_gte {
        binds.push(FilterBind::Time(date_gte));
        fragments.push(format!("created_at >= ${}", binds.len()));
    }

    if let Some(date_lte) = filter.date_lte {
        binds.push(FilterBind::Time(date_lte));
        fragments.push(format!("created_at <= ${}", binds.len()));
    }

    if fragments.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", fragments.join(" AND ")), binds)
    }
}

/// COUNT 查询，与页查询共用 WHERE 与绑定
pub(super) fn build_count_sql(filter: &CaseFilter) -> (String, Vec<FilterBind>) {
    let (where_clause, binds) = build_where(filter);
    let sql = format!("SELECT COUNT(*) FROM support_cases{}", where_clause);
    (sql, binds)
}

/// 页查询；LIMIT/OFFSET 占位符紧随筛选绑定之后，由调用方补绑
pub(super) fn build_page_sql(filter: &CaseFilter, sort: &CaseSort) -> (String, Vec<FilterBind>) {
    let (where_clause, binds) = build_where(filter);
    let sql = format!(
        "SELECT {} FROM support_cases{} ORDER BY {} {} LIMIT ${} OFFSET ${}",
        CASE_COLUMNS,
        where_clause,
        sort_column(sort.field),
        sort_direction(sort.order),
        binds.len() + 1,
        binds.len() + 2,
    );
    (sql, binds)
}

/// 排序列名只从封闭枚举映射，原始输入从不进入 SQL 文本
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Status => "status",
        SortField::Priority => "priority",
        SortField::CaseType => "case_type",
        SortField::CreatedBy => "created_by",
        SortField::CreatedAt => "created_at",
        SortField::Title => "title",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// 依序把绑定列表套到查询上；展开处需要 `FilterBind` 在作用域内
macro_rules! apply_filter_binds {
    ($query:expr, $binds:expr) => {{
        let mut query = $query;
        for bind in $binds {
            query = match bind {
                FilterBind::Text(value) => query.bind(value),
                FilterBind::Time(value) => query.bind(value),
            };
        }
        query
    }};
}

pub(super) use apply_filter_binds;

// =============================================================================
// 测试
// =============================================================================
