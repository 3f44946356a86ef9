//! 领域层
//!
//! 包含业务实体、值对象、仓储接口与 Unit of Work 接口

pub mod entities;
pub mod repositories;
pub mod unit_of_work;
pub mod value_objects;
