//! Unit of Work 模式
//!
//! 提供跨多个 Repository 的事务协调能力，确保操作的原子性。

use async_trait::async_trait;
use tracker_errors::AppResult;

use crate::domain::repositories::{CaseRepository, QueryRepository};

/// Unit of Work trait
///
/// 协调案例仓储与查询记录仓储在同一事务中的操作。
///
/// # 使用示例
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
///
/// // 所有操作在同一事务中
/// uow.cases().save(&case).await?;
/// uow.queries().save_many(&case.queries).await?;
///
/// // 提交事务
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 获取案例 Repository
    fn cases(&self) -> &dyn CaseRepository;

    /// 获取查询记录 Repository
    fn queries(&self) -> &dyn QueryRepository;

    /// 提交事务
    ///
    /// 成功时所有更改将持久化，失败时自动回滚。
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    ///
    /// 撤销所有未提交的更改。
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂 trait
///
/// 用于创建新的 UnitOfWork 实例。
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
