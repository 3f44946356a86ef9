//! Email 值对象

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Email 值对象
///
/// 构造时校验并统一小写存储。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(pub String);

impl Email {
    /// 创建新的 Email
    pub fn new(email: impl Into<String>) -> Result<Self, DomainError> {
        let email = email.into();

        if !Self::is_valid(&email) {
            return Err(DomainError::InvalidEmail(email));
        }

        Ok(Self(email.to_lowercase()))
    }

    /// 验证邮箱格式
    fn is_valid(email: &str) -> bool {
        // 简单的邮箱格式验证
        email.contains('@')
            && email.len() >= 3
            && email.len() <= 254
            && !email.starts_with('@')
            && !email.ends_with('@')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
