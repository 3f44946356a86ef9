//! 案例类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// 案例类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Support,
    Requirement,
    Investigation,
}

impl CaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseType::Support => "support",
            CaseType::Requirement => "requirement",
            CaseType::Investigation => "investigation",
        }
    }
}

impl FromStr for CaseType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "support" => Ok(CaseType::Support),
            "requirement" => Ok(CaseType::Requirement),
            "investigation" => Ok(CaseType::Investigation),
            other => Err(DomainError::UnknownCaseType(other.to_string())),
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
