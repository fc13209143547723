//! エラー型定義

use crate::types::Category;
use crate::validation::ValidationErrors;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("No item at {category}[{index}]")]
    ItemNotFound { category: Category, index: usize },

    #[error("no file to send")]
    NoFileToSend,

    #[error("A send for {category}[{index}] is already in progress")]
    SendInFlight { category: Category, index: usize },

    #[error("File does not match the original item: {0}")]
    MediaMismatch(String),

    #[error("Unknown category: {0} (use procesar or segmentar)")]
    UnknownCategory(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
