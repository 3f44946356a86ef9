//! 案例列表用例

use std::sync::Arc;

use tracker_common::{PagedResult, Pagination};
use tracker_errors::AppResult;

use crate::domain::entities::SupportCase;
use crate::domain::repositories::{CaseFilter, CaseRepository, CaseSort, QueryRepository};

/// 案例列表用例
///
/// 返回当页案例及各自的查询记录数，列表不加载记录本身。
pub struct GetCasesUseCase {
    cases: Arc<dyn CaseRepository>,
    queries: Arc<dyn QueryRepository>,
}

impl GetCasesUseCase {
    pub fn new(cases: Arc<dyn CaseRepository>, queries: Arc<dyn QueryRepository>) -> Self {
        Self { cases, queries }
    }

    pub async fn execute(
        &self,
        filter: &CaseFilter,
        sort: &CaseSort,
        pagination: &Pagination,
    ) -> AppResult<PagedResult<(SupportCase, i64)>> {
        let (cases, total) = self.cases.find_all(filter, sort, pagination).await?;

        let mut items = Vec::with_capacity(cases.len());
        for case in cases {
            let queries_count = self.queries.count_by_case_id(&case.id).await?;
            items.push((case, queries_count));
        }

        Ok(PagedResult::new(items, total as u64, pagination))
    }
}
