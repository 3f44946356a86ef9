//! 服务错误定义

use thiserror::Error;
use tracker_common::CaseId;
use tracker_errors::AppError;

use crate::domain::value_objects::CaseStatus;

/// 领域校验错误
///
/// 全部在实体工厂或值对象构造时抛出，发生在任何 I/O 之前。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title cannot exceed {max} characters")]
    TitleTooLong { max: usize },

    #[error("Description cannot exceed {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Unknown case status: {0}")]
    UnknownStatus(String),

    #[error("Unknown case type: {0}")]
    UnknownCaseType(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    #[error("Database name cannot be empty")]
    EmptyDatabaseName,

    #[error("Schema name cannot be empty")]
    EmptySchemaName,

    #[error("Query text cannot be empty")]
    EmptyQueryText,

    #[error("Query belongs to case {query_case_id}, not case {case_id}")]
    QueryOwnershipMismatch {
        query_case_id: CaseId,
        case_id: CaseId,
    },

    #[error("Cannot change status from {current} to {attempted}")]
    InvalidStatusChange {
        current: CaseStatus,
        attempted: CaseStatus,
    },
}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        AppError::validation(error.to_string())
    }
}
