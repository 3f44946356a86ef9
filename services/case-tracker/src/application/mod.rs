//! 应用层
//!
//! 用例编排：参数解析、事务边界、仓储调用顺序

pub mod use_cases;
