//! Core domain types and logic.

pub mod records;
pub mod arima;
pub mod forecast;
pub mod gap;
pub mod matcher;
pub mod live;
pub mod plan;
pub mod execution;
pub mod summary;
pub mod config_validation;
pub mod error;
