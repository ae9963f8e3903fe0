//! Error types for Bingo Night

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum BingoError {
    #[error("Content pool too small: {found} callable items, need at least {required}")]
    PoolTooSmall { found: usize, required: usize },

    #[error("Content pool must contain exactly one free item, found {0}")]
    FreeItemCount(usize),

    #[error("Duplicate item in content pool: {0}")]
    DuplicateItem(String),

    #[error("Cell index out of range: {0}")]
    CellOutOfRange(usize),

    #[error("Unknown game mode: {0}")]
    UnknownMode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BingoError {
    fn from(e: serde_json::Error) -> Self {
        BingoError::Serialization(e.to_string())
    }
}

impl From<serde_yml::Error> for BingoError {
    fn from(e: serde_yml::Error) -> Self {
        BingoError::Serialization(e.to_string())
    }
}

/// Result type alias
pub type BingoResult<T> = Result<T, BingoError>;
