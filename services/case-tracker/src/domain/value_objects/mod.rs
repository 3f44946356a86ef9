//! 值对象

mod case_priority;
mod case_status;
mod case_type;
mod email;

pub use case_priority::*;
pub use case_status::*;
pub use case_type::*;
pub use email::*;
