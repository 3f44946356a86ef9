//! 查询记录仓储接口

use async_trait::async_trait;
use tracker_common::CaseId;
use tracker_errors::AppResult;

use crate::domain::entities::CaseQuery;

/// 查询记录仓储
#[async_trait]
pub trait QueryRepository: Send + Sync {
    /// 插入单条查询记录
    async fn save(&self, query: &CaseQuery) -> AppResult<()>;

    /// 批量插入，整批作为一条多值 INSERT 执行；空切片为无操作
    async fn save_many(&self, queries: &[CaseQuery]) -> AppResult<()>;

    /// 按案例 ID 查找全部记录，按 executed_at 升序
    async fn find_by_case_id(&self, case_id: &CaseId) -> AppResult<Vec<CaseQuery>>;

    /// 按案例 ID 统计记录数
    async fn count_by_case_id(&self, case_id: &CaseId) -> AppResult<i64>;
}
