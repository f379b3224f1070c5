//! # sevahub-core
//!
//! Core building blocks shared by every Sevahub crate: the unified
//! [`error::AppError`] type, configuration schemas, and common request/response
//! types (pagination, sorting).

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
