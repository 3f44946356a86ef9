//! 系统路由
//!
//! 服务自描述、健康检查与指标导出

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;
use tracker_adapter_postgres::{check_pool_health, pool_status};

use super::state::AppState;

/// 服务信息
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "app": state.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// 存活检查
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// 就绪检查，验证数据库连通性并附带连接池快照
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match check_pool_health(&state.pool).await {
        Ok(()) => {
            let pool = pool_status(&state.pool);
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ready",
                    "pool": {
                        "size": pool.size,
                        "idle": pool.idle,
                        "active": pool.active,
                    },
                })),
            )
        }
        Err(error) => {
            warn!(error = %error, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready" })),
            )
        }
    }
}

/// Prometheus 指标导出
pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}
