//! Error types for fetching, catalog loading, pool building and drawing.

use thiserror::Error;

/// What a single resource fetch can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request aborted")]
    Aborted,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("unreadable response body: {0}")]
    Body(String),
    /// The fetch machinery itself is unavailable (no window, no fetch API).
    #[error("fetch unavailable: {0}")]
    Environment(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch pack list: {0}")]
    Fetch(#[from] FetchError),
    #[error("invalid pack list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a data file yielded no cards.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("content is not an array")]
    NotAnArray,
}

/// Errors that abort a whole pool build. Pack- and file-scoped failures
/// never surface here; they are logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("build cancelled")]
    Cancelled,
    #[error("{0}")]
    Environment(String),
}

/// Rejected draw requests. The messages are shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("请输入有效的抽卡数量！")]
    InvalidCount,
    #[error("卡池为空，无法抽取！")]
    EmptyPool,
    #[error("卡池中最多只能抽取 {max} 张卡牌。")]
    ExceedsPool { max: usize },
}
