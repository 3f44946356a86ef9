//! 案例状态

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// 案例状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Default for CaseStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Open => "open",
            CaseStatus::InProgress => "in_progress",
            CaseStatus::Resolved => "resolved",
            CaseStatus::Closed => "closed",
        }
    }

    /// 状态转移表
    ///
    /// 声明性定义，当前没有任何接口操作调用它。
    pub fn can_transition_to(&self, target: &CaseStatus) -> bool {
        matches!(
            (self, target),
            (CaseStatus::Open, CaseStatus::InProgress)
                | (CaseStatus::Open, CaseStatus::Closed)
                | (CaseStatus::InProgress, CaseStatus::Resolved)
                | (CaseStatus::InProgress, CaseStatus::Closed)
                | (CaseStatus::Resolved, CaseStatus::Closed)
        )
    }
}

impl FromStr for CaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(CaseStatus::Open),
            "in_progress" => Ok(CaseStatus::InProgress),
            "resolved" => Ok(CaseStatus::Resolved),
            "closed" => Ok(CaseStatus::Closed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
