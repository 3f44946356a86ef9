//! 创建案例用例

use std::sync::Arc;

use tracing::{error, info};
use tracker_errors::AppResult;

use crate::domain::entities::{CaseQuery, SupportCase};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::{CasePriority, CaseType, Email};

/// 创建案例的输入
#[derive(Debug, Clone)]
pub struct CreateCaseInput {
    pub title: String,
    pub description: Option<String>,
    pub case_type: String,
    pub priority: String,
    pub created_by: String,
    pub queries: Vec<CreateQueryInput>,
}

/// 创建案例时附带的查询记录输入
#[derive(Debug, Clone)]
pub struct CreateQueryInput {
    pub database_name: String,
    pub schema_name: String,
    pub query_text: String,
    pub execution_time_ms: Option<i64>,
    pub rows_affected: Option<i64>,
}

/// 创建案例用例
///
/// 案例行与其全部查询记录在同一事务中写入，任一步失败则整体回滚。
pub struct CreateCaseUseCase {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl CreateCaseUseCase {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }

    pub async fn execute(&self, input: CreateCaseInput) -> AppResult<SupportCase> {
        let uow = self.uow_factory.begin().await?;

        let result = Self::persist(uow.as_ref(), input).await;

        match result {
            Ok(case) => {
                uow.commit().await?;
                info!(
                    case_id = %case.id,
                    query_count = case.queries.len(),
                    "Case created"
                );
                Ok(case)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    error!(
                        error = %rollback_err,
                        "Rollback failed after case creation error"
                    );
                }
                Err(err)
            }
        }
    }

    async fn persist(uow: &dyn UnitOfWork, input: CreateCaseInput) -> AppResult<SupportCase> {
        let case_type = input.case_type.parse::<CaseType>()?;
        let priority = input.priority.parse::<CasePriority>()?;
        let created_by = Email::new(input.created_by)?;

        let mut case = SupportCase::create(
            input.title,
            input.description,
            case_type,
            priority,
            created_by,
        )?;

        uow.cases().save(&case).await?;

        // 查询记录的执行人记为案例创建人
        for query_input in input.queries {
            let query = CaseQuery::create(
                case.id.clone(),
                query_input.database_name,
                query_input.schema_name,
                query_input.query_text,
                case.created_by.clone(),
                query_input.execution_time_ms,
                query_input.rows_affected,
            )?;
            case.add_query(query)?;
        }

        if !case.queries.is_empty() {
            uow.queries().save_many(&case.queries).await?;
        }

        Ok(case)
    }
}
