//! 支持案例聚合根

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_common::CaseId;

use crate::domain::entities::CaseQuery;
use crate::domain::value_objects::{CasePriority, CaseStatus, CaseType, Email};
use crate::error::DomainError;

/// 标题长度上限
pub const MAX_TITLE_LENGTH: usize = 200;
/// 描述长度上限
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// 支持案例聚合根
///
/// 案例持有其全部查询记录；从存储读取时 `queries` 为空，由调用方补水。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportCase {
    pub id: CaseId,
    pub title: String,
    pub description: Option<String>,
    pub case_type: CaseType,
    pub priority: CasePriority,
    pub status: CaseStatus,
    pub created_by: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub queries: Vec<CaseQuery>,
}

impl SupportCase {
    /// 创建新案例，字段约束全部在此校验
    pub fn create(
        title: String,
        description: Option<String>,
        case_type: CaseType,
        priority: CasePriority,
        created_by: Email,
    ) -> Result<Self, DomainError> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
            });
        }

        if let Some(description) = &description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(DomainError::DescriptionTooLong {
                    max: MAX_DESCRIPTION_LENGTH,
                });
            }
        }

        let now = Utc::now();

        Ok(Self {
            id: CaseId::new(),
            title,
            description,
            case_type,
            priority,
            status: CaseStatus::Open,
            created_by,
            created_at: now,
            updated_at: now,
            queries: Vec::new(),
        })
    }

    /// 追加查询记录，归属不符时拒绝且不改变案例
    pub fn add_query(&mut self, query: CaseQuery) -> Result<(), DomainError> {
        if query.case_id != self.id {
            return Err(DomainError::QueryOwnershipMismatch {
                query_case_id: query.case_id,
                case_id: self.id.clone(),
            });
        }

        self.queries.push(query);
        self.updated_at = Utc::now();
        Ok(())
    }

    // ========================================================
    // 状态变更方法
    //
    // 这些方法早于 CaseStatus::can_transition_to 的转移表，
    // 各自带有自己的前置条件，不查表。
    // ========================================================

    /// 标记为处理中，已关闭的案例不允许
    pub fn mark_in_progress(&mut self) -> Result<(), DomainError> {
        if self.status == CaseStatus::Closed {
            return Err(DomainError::InvalidStatusChange {
                current: self.status.clone(),
                attempted: CaseStatus::InProgress,
            });
        }

        self.status = CaseStatus::InProgress;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 标记为已解决，仅允许从 open 或 in_progress
    pub fn mark_resolved(&mut self) -> Result<(), DomainError> {
        if !matches!(self.status, CaseStatus::Open | CaseStatus::InProgress) {
            return Err(DomainError::InvalidStatusChange {
                current: self.status.clone(),
                attempted: CaseStatus::Resolved,
            });
        }

        self.status = CaseStatus::Resolved;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 关闭案例，仅允许从 resolved
    pub fn close(&mut self) -> Result<(), DomainError> {
        if self.status != CaseStatus::Resolved {
            return Err(DomainError::InvalidStatusChange {
                current: self.status.clone(),
                attempted: CaseStatus::Closed,
            });
        }

        self.status = CaseStatus::Closed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_case() -> SupportCase {
        SupportCase::create(
            "Orders report is slow".to_string(),
            Some("The monthly orders report takes over a minute".to_string()),
            CaseType::Support,
            CasePriority::High,
            Email::new("agent@example.com").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_case() {
        let case = create_test_case();

        assert_eq!(case.status, CaseStatus::Open);
        assert_eq!(case.title, "Orders report is slow");
        assert!(case.queries.is_empty());
        assert_eq!(case.created_at, case.updated_at);
    }

    #[test]
    fn test_title_is_trimmed() {
        let case = SupportCase::create(
            "  Orders report is slow  ".to_string(),
            None,
            CaseType::Support,
            CasePriority::Low,
            Email::new("agent@example.com").unwrap(),
        )
        .unwrap();

        assert_eq!(case.title, "Orders report is slow");
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = SupportCase::create(
            "   ".to_string(),
            None,
            CaseType::Support,
            CasePriority::Low,
            Email::new("agent@example.com").unwrap(),
        );

        assert_eq!(result.unwrap_err(), DomainError::EmptyTitle);
    }

    #[test]
    fn test_title_length_boundary() {
        let at_limit = "x".repeat(MAX_TITLE_LENGTH);
        let over_limit = "x".repeat(MAX_TITLE_LENGTH + 1);
        let email = Email::new("agent@example.com").unwrap();

        assert!(
            SupportCase::create(
                at_limit,
                None,
                CaseType::Support,
                CasePriority::Low,
                email.clone()
            )
            .is_ok()
        );
        assert_eq!(
            SupportCase::create(
                over_limit,
                None,
                CaseType::Support,
                CasePriority::Low,
                email
            )
            .unwrap_err(),
            DomainError::TitleTooLong {
                max: MAX_TITLE_LENGTH
            }
        );
    }

    #[test]
    fn test_description_length_boundary() {
        let email = Email::new("agent@example.com").unwrap();

        let at_limit = Some("d".repeat(MAX_DESCRIPTION_LENGTH));
        assert!(
            SupportCase::create(
                "Title".to_string(),
                at_limit,
                CaseType::Support,
                CasePriority::Low,
                email.clone()
            )
            .is_ok()
        );

        let over_limit = Some("d".repeat(MAX_DESCRIPTION_LENGTH + 1));
        assert_eq!(
            SupportCase::create(
                "Title".to_string(),
                over_limit,
                CaseType::Support,
                CasePriority::Low,
                email
            )
            .unwrap_err(),
            DomainError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LENGTH
            }
        );
    }

    #[test]
    fn test_add_query() {
        let mut case = create_test_case();
        let query = CaseQuery::create(
            case.id.clone(),
            "orders_db".to_string(),
            "public".to_string(),
            "SELECT 1".to_string(),
            case.created_by.clone(),
            None,
            None,
        )
        .unwrap();

        case.add_query(query).unwrap();

        assert_eq!(case.queries.len(), 1);
        assert!(case.updated_at >= case.created_at);
    }

    #[test]
    fn test_add_query_with_foreign_case_id() {
        let mut case = create_test_case();
        let foreign = CaseQuery::create(
            CaseId::new(),
            "orders_db".to_string(),
            "public".to_string(),
            "SELECT 1".to_string(),
            case.created_by.clone(),
            None,
            None,
        )
        .unwrap();

        assert!(case.add_query(foreign).is_err());
        assert!(case.queries.is_empty());
    }

    #[test]
    fn test_mark_in_progress() {
        let mut case = create_test_case();

        case.mark_in_progress().unwrap();

        assert_eq!(case.status, CaseStatus::InProgress);
    }

    #[test]
    fn test_mark_in_progress_rejected_when_closed() {
        let mut case = create_test_case();
        case.mark_in_progress().unwrap();
        case.mark_resolved().unwrap();
        case.close().unwrap();

        let err = case.mark_in_progress().unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidStatusChange {
                current: CaseStatus::Closed,
                attempted: CaseStatus::InProgress,
            }
        );
    }

    #[test]
    fn test_mark_resolved_from_open() {
        let mut case = create_test_case();

        case.mark_resolved().unwrap();

        assert_eq!(case.status, CaseStatus::Resolved);
    }

    #[test]
    fn test_mark_resolved_rejected_when_resolved() {
        let mut case = create_test_case();
        case.mark_resolved().unwrap();

        assert!(case.mark_resolved().is_err());
    }

    #[test]
    fn test_close_requires_resolved() {
        let mut case = create_test_case();

        assert!(case.close().is_err());

        case.mark_resolved().unwrap();
        case.close().unwrap();

        assert_eq!(case.status, CaseStatus::Closed);
    }
}
