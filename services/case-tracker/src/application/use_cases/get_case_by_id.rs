//! 案例详情用例

use std::sync::Arc;

use tracker_common::CaseId;
use tracker_errors::AppResult;

use crate::domain::entities::SupportCase;
use crate::domain::repositories::{CaseRepository, QueryRepository};

/// 案例详情用例
///
/// 未命中返回 None，由接口层决定如何呈现。
pub struct GetCaseByIdUseCase {
    cases: Arc<dyn CaseRepository>,
    queries: Arc<dyn QueryRepository>,
}

impl GetCaseByIdUseCase {
    pub fn new(cases: Arc<dyn CaseRepository>, queries: Arc<dyn QueryRepository>) -> Self {
        Self { cases, queries }
    }

    pub async fn execute(&self, id: &CaseId) -> AppResult<Option<SupportCase>> {
        let mut case = match self.cases.find_by_id(id).await? {
            Some(case) => case,
            None => return Ok(None),
        };

        case.queries = self.queries.find_by_case_id(id).await?;

        Ok(Some(case))
    }
}
