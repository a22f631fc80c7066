//! # 统一错误处理模块
//!
//! 定义 mpbulk 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// mpbulk 统一错误类型
#[derive(Error, Debug)]
pub enum MpBulkError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid material id '{id}' in {path} (line {line})")]
    InvalidIdentifier {
        id: String,
        path: String,
        line: usize,
    },

    #[error("No material ids found in {path}")]
    EmptyIdentifierList { path: String },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    // ─────────────────────────────────────────────────────────────
    // Materials Project API 错误
    // ─────────────────────────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Materials Project API returned {status}\n{body}")]
    ApiError { status: u16, body: String },

    #[error("Materials Project has no entry for '{0}'")]
    UnknownIdentifier(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MpBulkError>;
