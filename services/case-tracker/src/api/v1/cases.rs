//! 案例路由

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use tracker_common::CaseId;
use tracker_errors::{AppError, AppResult};

use super::schemas::{CaseListResponse, CaseResponse, CreateCaseRequest, ListCasesParams};
use crate::api::state::AppState;
use crate::infrastructure::observability::metrics;

/// 案例路由
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_case).get(list_cases))
        .route("/{id}", get(get_case))
}

/// 创建案例及其查询记录
async fn create_case(
    State(state): State<AppState>,
    Json(request): Json<CreateCaseRequest>,
) -> AppResult<(StatusCode, Json<CaseResponse>)> {
    info!(title = %request.title, "Create case request");

    let case = match state.create_case.execute(request.into_input()).await {
        Ok(case) => case,
        Err(error) => {
            metrics::record_case_creation_failed();
            return Err(error);
        }
    };

    metrics::record_case_created(
        case.case_type.as_str(),
        case.priority.as_str(),
        case.queries.len(),
    );

    Ok((StatusCode::CREATED, Json(CaseResponse::from_entity(case))))
}

/// 筛选分页列出案例
async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<ListCasesParams>,
) -> AppResult<Json<CaseListResponse>> {
    let (filter, sort, pagination) = params.into_query()?;

    let result = state.get_cases.execute(&filter, &sort, &pagination).await?;
    metrics::record_cases_listed(result.items.len());

    Ok(Json(CaseListResponse::from_page(result)))
}

/// 按 ID 获取案例详情
async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CaseResponse>> {
    let case_id = CaseId::from_string(&id)
        .map_err(|_| AppError::validation(format!("Invalid case id: {}", id)))?;

    match state.get_case_by_id.execute(&case_id).await? {
        Some(case) => {
            metrics::record_case_fetched(true);
            Ok(Json(CaseResponse::from_entity(case)))
        }
        None => {
            metrics::record_case_fetched(false);
            Err(AppError::not_found(format!("Case {} not found", id)))
        }
    }
}
