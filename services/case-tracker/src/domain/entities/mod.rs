//! 领域实体

mod case_query;
mod support_case;

pub use case_query::*;
pub use support_case::*;
