//! API v1

pub mod cases;
pub mod schemas;
