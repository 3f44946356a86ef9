//! 应用状态

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

use crate::application::use_cases::{CreateCaseUseCase, GetCaseByIdUseCase, GetCasesUseCase};

/// 路由层共享状态
#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub app_env: String,
    pub pool: PgPool,
    pub metrics: PrometheusHandle,
    pub create_case: Arc<CreateCaseUseCase>,
    pub get_cases: Arc<GetCasesUseCase>,
    pub get_case_by_id: Arc<GetCaseByIdUseCase>,
}
