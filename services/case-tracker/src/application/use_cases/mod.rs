//! 用例

mod create_case;
mod get_case_by_id;
mod get_cases;

pub use create_case::*;
pub use get_case_by_id::*;
pub use get_cases::*;
