//! Case Tracker Service - 案例跟踪服务入口

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use tokio::net::TcpListener;
use tracing::{error, info};

use case_tracker::api::{self, state::AppState};
use case_tracker::application::use_cases::{
    CreateCaseUseCase, GetCaseByIdUseCase, GetCasesUseCase,
};
use case_tracker::domain::repositories::{CaseRepository, QueryRepository};
use case_tracker::infrastructure::persistence::{
    migrations, PostgresCaseRepository, PostgresQueryRepository, PostgresUnitOfWorkFactory,
};
use tracker_adapter_postgres::{create_pool, MigrationManager, PostgresConfig};
use tracker_bootstrap::{init_runtime, shutdown_signal};
use tracker_config::AppConfig;
use tracker_telemetry::init_metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    init_runtime(&config);
    let metrics_handle = init_metrics();

    let database = &config.database;
    let pg_config = PostgresConfig::new(
        database.host.clone(),
        database.port,
        database.user.clone(),
        Secret::new(database.password.expose_secret().clone()),
        database.name.clone(),
    )
    .with_min_connections(database.min_connections)
    .with_max_connections(database.max_connections)
    .with_acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
    .with_idle_timeout(Duration::from_secs(database.idle_timeout_secs))
    .with_statement_timeout(Duration::from_secs(database.statement_timeout_secs));

    let pool = create_pool(&pg_config).await?;
    info!("Database pool ready");

    let migration_result = MigrationManager::new(pool.clone())
        .migrate(&migrations::all())
        .await?;
    if !migration_result.is_success() {
        for failure in &migration_result.errors {
            error!(
                version = failure.version,
                name = %failure.name,
                error = %failure.error,
                "Migration failed"
            );
        }
        return Err("Database migration failed".into());
    }
    info!(
        applied = migration_result.applied_count(),
        "Migrations up to date"
    );

    let case_repo: Arc<dyn CaseRepository> = Arc::new(PostgresCaseRepository::new(pool.clone()));
    let query_repo: Arc<dyn QueryRepository> =
        Arc::new(PostgresQueryRepository::new(pool.clone()));
    let uow_factory = Arc::new(PostgresUnitOfWorkFactory::new(pool.clone()));

    let state = AppState {
        app_name: config.app_name.clone(),
        app_env: config.app_env.clone(),
        pool: pool.clone(),
        metrics: metrics_handle,
        create_case: Arc::new(CreateCaseUseCase::new(uow_factory)),
        get_cases: Arc::new(GetCasesUseCase::new(case_repo.clone(), query_repo.clone())),
        get_case_by_id: Arc::new(GetCaseByIdUseCase::new(case_repo, query_repo)),
    };

    let app = api::router(state, &config.cors);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Case tracker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}
