//! PostgreSQL 健康检查模块

use sqlx::PgPool;
use tracker_errors::{AppError, AppResult};

/// 检查连接池是否健康
pub async fn check_pool_health(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Pool health check failed: {}", e)))?;
    Ok(())
}

/// 连接池状态快照
#[derive(Debug, Clone)]
pub struct PoolStatus {
    /// 连接池大小
    pub size: u32,
    /// 空闲连接数
    pub idle: u32,
    /// 活跃连接数
    pub active: u32,
}

/// 获取连接池状态
pub fn pool_status(pool: &PgPool) -> PoolStatus {
    let size = pool.size();
    let idle = pool.num_idle() as u32;
    PoolStatus {
        size,
        idle,
        active: size.saturating_sub(idle),
    }
}
