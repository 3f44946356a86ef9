//! 可观测性模块

pub mod metrics;
