use std::path::{Path, PathBuf};

use crate::boilerplate::compile_footer_pattern;
use crate::chapters::default_chapter_seeds;
use crate::error::ExtractError;
use crate::model::ChapterSeed;
use crate::table_detect::DEFAULT_MIN_COLS;

pub const DEFAULT_SAMPLE_PAGES: usize = 20;
pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_FOOTER_LITERAL: &str = "icma";
pub const DEFAULT_FOOTER_PATTERN: &str = r"Cancer Monograph\s*\d+";

/// How line breaks inside table data cells are collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellLineBreaks {
    /// Collapses runs of the letter `n` and `\r`, as earlier releases did.
    #[default]
    Legacy,
    /// Collapses runs of `\n` and `\r`.
    Newlines,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub chapters: Vec<ChapterSeed>,
    pub sample_pages: usize,
    pub threshold: f64,
    pub min_table_cols: usize,
    pub footer_literals: Vec<String>,
    pub footer_pattern: String,
    pub cell_line_breaks: CellLineBreaks,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Cancer_Monographs-new.pdf"),
            output: PathBuf::from("cleaned.json"),
            chapters: default_chapter_seeds(),
            sample_pages: DEFAULT_SAMPLE_PAGES,
            threshold: DEFAULT_THRESHOLD,
            min_table_cols: DEFAULT_MIN_COLS,
            footer_literals: vec![DEFAULT_FOOTER_LITERAL.to_string()],
            footer_pattern: DEFAULT_FOOTER_PATTERN.to_string(),
            cell_line_breaks: CellLineBreaks::Legacy,
        }
    }
}

impl ExtractOptions {
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidOption`] for out-of-range sampling
    /// parameters, an unusable chapter list or a bad footer pattern.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.sample_pages == 0 {
            return Err(ExtractError::InvalidOption(
                "sample_pages must be at least 1".to_string(),
            ));
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ExtractError::InvalidOption(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.min_table_cols < 2 {
            return Err(ExtractError::InvalidOption(
                "min_table_cols must be at least 2".to_string(),
            ));
        }
        if self.chapters.is_empty() {
            return Err(ExtractError::InvalidOption(
                "at least one chapter is required".to_string(),
            ));
        }
        if let Some(seed) = self
            .chapters
            .iter()
            .find(|seed| seed.chapter == 0 || seed.start_page == 0)
        {
            return Err(ExtractError::InvalidOption(format!(
                "chapter numbers and start pages are 1-based (chapter {} starts on page {})",
                seed.chapter, seed.start_page
            )));
        }
        compile_footer_pattern(&self.footer_pattern)?;
        Ok(())
    }
}

/// Reads chapter seeds from a JSON array of
/// `{"chapter": 1, "title": "...", "start_page": 28}` objects.
///
/// # Errors
///
/// Fails when the file cannot be read or is not a valid seed list.
pub fn load_chapter_seeds(path: &Path) -> Result<Vec<ChapterSeed>, ExtractError> {
    let raw = std::fs::read_to_string(path)?;
    parse_chapter_seeds(&raw)
        .map_err(|error| ExtractError::InvalidChapterFile(format!("{}: {error}", path.display())))
}

pub(crate) fn parse_chapter_seeds(raw: &str) -> Result<Vec<ChapterSeed>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::{CellLineBreaks, ExtractOptions, parse_chapter_seeds};
    use crate::error::ExtractError;
    use crate::model::ChapterSeed;

    #[test]
    fn defaults_are_valid() {
        let options = ExtractOptions::default();
        options.validate().expect("defaults should validate");
        assert_eq!(options.sample_pages, 20);
        assert_eq!(options.chapters.len(), 9);
        assert_eq!(options.cell_line_breaks, CellLineBreaks::Legacy);
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        for threshold in [0.0, -0.5, 1.5, f64::NAN] {
            let options = ExtractOptions {
                threshold,
                ..ExtractOptions::default()
            };
            let err = options.validate().expect_err("threshold should be rejected");
            assert!(matches!(err, ExtractError::InvalidOption(_)));
        }
    }

    #[test]
    fn rejects_zero_based_chapter() {
        let options = ExtractOptions {
            chapters: vec![ChapterSeed::new(1, "One", 0)],
            ..ExtractOptions::default()
        };
        let err = options.validate().expect_err("page 0 should be rejected");
        assert!(err.to_string().contains("1-based"));
    }

    #[test]
    fn rejects_bad_footer_pattern() {
        let options = ExtractOptions {
            footer_pattern: "Monograph (".to_string(),
            ..ExtractOptions::default()
        };
        let err = options.validate().expect_err("pattern should be rejected");
        assert!(err.to_string().contains("footer pattern"));
    }

    #[test]
    fn parses_chapter_seed_json() {
        let seeds = parse_chapter_seeds(
            r#"[{"chapter": 1, "title": "Intro", "start_page": 1},
                {"chapter": 2, "title": "Méthodes", "start_page": 4}]"#,
        )
        .expect("seeds should parse");
        assert_eq!(seeds[1], ChapterSeed::new(2, "Méthodes", 4));
    }

    #[test]
    fn rejects_seed_without_start_page() {
        assert!(parse_chapter_seeds(r#"[{"chapter": 1, "title": "Intro"}]"#).is_err());
    }
}
