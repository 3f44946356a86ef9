//! HTTP API 层
//!
//! 路由组装、共享状态与系统端点

pub mod state;
pub mod system;
pub mod v1;

use axum::http::HeaderValue;
use axum::{routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use tracker_config::CorsConfig;

use self::state::AppState;

/// 组装完整路由
pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/health/ready", get(system::readiness))
        .route("/metrics", get(system::metrics))
        .nest("/api/v1/cases", v1::cases::routes())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors))
        .with_state(state)
}

/// 构建 CORS 层，无法解析的来源跳过并告警
fn build_cors(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
