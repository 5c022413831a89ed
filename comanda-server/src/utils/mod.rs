//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型 (from shared::error)
//! - 日志等工具

pub mod logger;

// Re-export error types from shared
pub use shared::error::{AppError, AppResponse, AppResult, ok, ok_with_message};
