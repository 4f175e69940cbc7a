//! Detection of running headers and footers.

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;
use crate::model::{HeaderFooterSets, PageSource};
use crate::options::ExtractOptions;
use crate::warning::{ExtractWarning, WarningCode};

/// Pages kept clear of the sample at both ends of the document.
pub const SAMPLE_EDGE_MARGIN: usize = 10;

/// Half-open range of 0-based page indices voted on for running lines.
#[must_use]
pub fn sample_window(page_count: usize, sample_pages: usize) -> std::ops::Range<usize> {
    let start = SAMPLE_EDGE_MARGIN.max(page_count / 4);
    let end = page_count
        .saturating_sub(SAMPLE_EDGE_MARGIN)
        .min(start.saturating_add(sample_pages));
    start..end.max(start)
}

/// Smallest vote count that makes a candidate line common.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn min_votes(sampled: usize, threshold: f64) -> usize {
    (sampled as f64 * threshold).floor() as usize
}

#[derive(Debug, Default)]
struct EdgeVotes {
    headers: HashMap<String, usize>,
    footers: HashMap<String, usize>,
    sampled: usize,
}

impl EdgeVotes {
    fn record_page(&mut self, text: &str) {
        let lines = text.split('\n').collect::<Vec<_>>();
        if lines.len() <= 2 {
            return;
        }
        self.sampled += 1;

        let non_empty = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        if let (Some(first), Some(last)) = (non_empty.first(), non_empty.last()) {
            *self.headers.entry((*first).to_string()).or_insert(0) += 1;
            *self.footers.entry((*last).to_string()).or_insert(0) += 1;
        }
    }

    fn common(votes: HashMap<String, usize>, min_count: usize) -> impl Iterator<Item = String> {
        votes
            .into_iter()
            .filter(move |(_, count)| *count >= min_count)
            .map(|(line, _)| line)
    }
}

/// Collects running headers and footers for `document`.
///
/// First and last non-empty lines are voted on across [`sample_window`];
/// a line is common once its votes reach `floor(sampled * threshold)`,
/// where `sampled` counts only pages with more than two lines. The footer
/// set also receives the configured literals and every match of the
/// footer pattern anywhere in the document.
///
/// # Errors
///
/// Fails when a page cannot be read or the footer pattern does not compile.
pub fn detect_running_lines(
    document: &impl PageSource,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<HeaderFooterSets, ExtractError> {
    let page_count = document.page_count();
    let mut votes = EdgeVotes::default();
    for index in sample_window(page_count, options.sample_pages) {
        votes.record_page(document.page_text(index)?);
    }

    if votes.sampled == 0 {
        warnings.push(ExtractWarning::new(
            WarningCode::EmptyHeaderSample,
            "no page qualified for header/footer sampling",
        ));
    }

    let min_count = min_votes(votes.sampled, options.threshold);
    debug!(
        sampled = votes.sampled,
        min_count, "header/footer votes collected"
    );

    let mut sets = HeaderFooterSets {
        headers: EdgeVotes::common(votes.headers, min_count).collect(),
        footers: EdgeVotes::common(votes.footers, min_count).collect(),
    };
    sets.footers.extend(options.footer_literals.iter().cloned());

    let footer_pattern = compile_footer_pattern(&options.footer_pattern)?;
    for index in 0..page_count {
        let text = document.page_text(index)?;
        sets.footers.extend(
            footer_pattern
                .find_iter(text)
                .map(|found| found.as_str().trim().to_string()),
        );
    }

    Ok(sets)
}

pub(crate) fn compile_footer_pattern(pattern: &str) -> Result<Regex, ExtractError> {
    Regex::new(pattern)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid footer pattern: {error}")))
}

#[cfg(test)]
mod tests {
    use super::{EdgeVotes, detect_running_lines, min_votes, sample_window};
    use crate::model::InMemoryDocument;
    use crate::options::ExtractOptions;
    use crate::warning::WarningCode;

    fn page(header: &str, body: &str, footer: &str) -> String {
        format!("{header}\n{body}\nmore body\n{footer}\n")
    }

    #[test]
    fn window_starts_at_first_quarter() {
        assert_eq!(sample_window(200, 20), 50..70);
        assert_eq!(sample_window(60, 20), 15..35);
        assert_eq!(sample_window(30, 20), 10..20);
    }

    #[test]
    fn window_is_empty_for_short_documents() {
        assert!(sample_window(5, 20).is_empty());
        assert!(sample_window(20, 20).is_empty());
        assert!(sample_window(0, 20).is_empty());
    }

    #[test]
    fn huge_sample_size_is_clipped_to_document() {
        assert_eq!(sample_window(100, usize::MAX), 25..90);
    }

    #[test]
    fn huge_sample_size_still_detects_headers() {
        let pages = (0..40)
            .map(|index| page("Running Head", &format!("body {index}"), "end"))
            .collect::<Vec<_>>();
        let document = InMemoryDocument::new(pages);
        let options = ExtractOptions {
            sample_pages: usize::MAX,
            ..ExtractOptions::default()
        };
        let mut warnings = Vec::new();

        let sets = detect_running_lines(&document, &options, &mut warnings)
            .expect("detection should succeed");

        assert!(sets.headers.contains("Running Head"));
        assert!(sets.footers.contains("end"));
    }

    #[test]
    fn min_votes_rounds_down() {
        assert_eq!(min_votes(20, 0.5), 10);
        assert_eq!(min_votes(7, 0.5), 3);
        assert_eq!(min_votes(0, 0.5), 0);
    }

    #[test]
    fn votes_skip_pages_with_two_lines_or_fewer() {
        let mut votes = EdgeVotes::default();
        votes.record_page("only\nshort");
        votes.record_page("\n  Title  \nbody\n\n  7 \n");
        assert_eq!(votes.sampled, 1);
        assert_eq!(votes.headers.get("Title"), Some(&1));
        assert_eq!(votes.footers.get("7"), Some(&1));
    }

    #[test]
    fn single_content_line_votes_as_header_and_footer() {
        let mut votes = EdgeVotes::default();
        votes.record_page("\nlonely\n\n");
        assert_eq!(votes.headers.get("lonely"), Some(&1));
        assert_eq!(votes.footers.get("lonely"), Some(&1));
    }

    #[test]
    fn frequent_first_line_becomes_header() {
        // 60 pages sample indices 15..35; the running head covers 12 of those 20.
        let pages = (0..60)
            .map(|index| {
                let header = if (15..27).contains(&index) {
                    "Cancer Research in India"
                } else if (27..35).contains(&index) {
                    "Rare Heading"
                } else {
                    "Front matter"
                };
                page(header, &format!("body {index}"), &format!("Page {}", index + 1))
            })
            .collect::<Vec<_>>();
        let document = InMemoryDocument::new(pages);
        let mut warnings = Vec::new();

        let sets = detect_running_lines(&document, &ExtractOptions::default(), &mut warnings)
            .expect("detection should succeed");

        assert!(sets.headers.contains("Cancer Research in India"));
        assert!(!sets.headers.contains("Rare Heading"));
        assert!(!sets.headers.contains("Front matter"));
        assert!(!sets.footers.iter().any(|line| line.starts_with("Page ")));
        assert!(warnings.is_empty());
    }

    #[test]
    fn footer_set_gets_literal_and_monograph_matches() {
        let mut pages = vec!["intro\ntext\nend".to_string(); 4];
        pages.push("body\nICMR Cancer Monograph   7 and more\nCancer Monograph12".to_string());
        let document = InMemoryDocument::new(pages);
        let mut warnings = Vec::new();

        let sets = detect_running_lines(&document, &ExtractOptions::default(), &mut warnings)
            .expect("detection should succeed");

        assert!(sets.headers.is_empty());
        assert!(sets.footers.contains("icma"));
        assert!(sets.footers.contains("Cancer Monograph   7"));
        assert!(sets.footers.contains("Cancer Monograph12"));
        assert_eq!(warnings[0].code, WarningCode::EmptyHeaderSample);
    }
}
