#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningCode {
    ChapterRangeClamped,
    ChapterOrderUnsorted,
    EmptyChapter,
    EmptyHeaderSample,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub chapter: Option<u32>,
    pub page: Option<usize>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            chapter: None,
            page: None,
        }
    }

    #[must_use]
    pub fn with_chapter(mut self, chapter: u32) -> Self {
        self.chapter = Some(chapter);
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}
