use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid chapter file: {0}")]
    InvalidChapterFile(String),

    #[error("page index {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },
}
