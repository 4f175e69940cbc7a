mod boilerplate;
mod chapters;
mod clean_text;
mod error;
mod json_out;
mod model;
mod options;
mod pdf_reader;
mod table_detect;
mod table_format;
mod table_parse;
mod warning;

use tracing::{debug, info};

use crate::chapters::check_seed_order;
use crate::json_out::{write_json, write_json_to_string};
use crate::warning::WarningCode;

pub use boilerplate::{detect_running_lines, min_votes, sample_window};
pub use chapters::{build_chapter_map, default_chapter_seeds};
pub use clean_text::{
    clean_page_text, dehyphenate, is_bullet_item, is_numbered_item, merge_soft_breaks,
    normalize_whitespace, strip_running_lines,
};
pub use error::ExtractError;
pub use model::{
    ChapterDescriptor, ChapterSeed, CleanedChapter, HeaderFooterSets, InMemoryDocument,
    OutputDocument, PageSource, RawTable, TableRecord, TableRow,
};
pub use options::{CellLineBreaks, ExtractOptions, load_chapter_seeds};
pub use pdf_reader::PdfDocument;
pub use table_format::format_table;
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub chapter_count: usize,
    pub page_count: usize,
    pub table_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    pub output: OutputDocument,
    pub running_lines: HeaderFooterSets,
    pub pages_processed: usize,
    pub warnings: Vec<ExtractWarning>,
}

impl ProcessedDocument {
    #[must_use]
    pub fn report(&self) -> ExtractionReport {
        ExtractionReport {
            chapter_count: self.output.chapters.len(),
            page_count: self.pages_processed,
            table_count: self
                .output
                .chapters
                .iter()
                .map(|chapter| chapter.tables.len())
                .sum(),
            warnings: self.warnings.clone(),
        }
    }
}

/// 0-based page indices of `chapter`, clamped to the document.
fn chapter_page_indices(
    chapter: &ChapterDescriptor,
    page_count: usize,
    warnings: &mut Vec<ExtractWarning>,
) -> std::ops::Range<usize> {
    if chapter.end_page > page_count {
        warnings.push(
            ExtractWarning::new(
                WarningCode::ChapterRangeClamped,
                format!(
                    "chapter ends on page {} but the document has {page_count} pages",
                    chapter.end_page
                ),
            )
            .with_chapter(chapter.chapter)
            .with_page(chapter.end_page),
        );
    }

    let start = chapter.start_page.saturating_sub(1);
    let end = chapter.end_page.min(page_count);
    if start >= end {
        warnings.push(
            ExtractWarning::new(
                WarningCode::EmptyChapter,
                format!(
                    "chapter covers no pages (pages {}-{})",
                    chapter.start_page, chapter.end_page
                ),
            )
            .with_chapter(chapter.chapter),
        );
        return start..start;
    }
    start..end
}

/// Formatted tables of one page; tables with no surviving rows are skipped
/// but still consume their index.
fn format_page_tables(
    document: &impl PageSource,
    index: usize,
    options: &ExtractOptions,
) -> Result<Vec<TableRecord>, ExtractError> {
    Ok(document
        .page_tables(index)?
        .iter()
        .enumerate()
        .filter_map(|(table_index, raw)| {
            format_table(raw, options.cell_line_breaks).map(|data| TableRecord {
                table_name: TableRecord::table_name(index + 1, table_index),
                data,
            })
        })
        .collect())
}

fn process_chapter(
    document: &impl PageSource,
    chapter: &ChapterDescriptor,
    running: &HeaderFooterSets,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<(CleanedChapter, usize), ExtractError> {
    let pages = chapter_page_indices(chapter, document.page_count(), warnings);
    let page_total = pages.len();
    let mut content = String::new();
    let mut tables = Vec::new();

    for index in pages {
        let cleaned = clean_page_text(document.page_text(index)?, running);
        // Pages that clean to nothing add no separator.
        if !cleaned.is_empty() {
            content.push_str(&cleaned);
            content.push(' ');
        }

        let page_tables = format_page_tables(document, index, options)?;
        debug!(
            page = index + 1,
            chars = cleaned.len(),
            tables = page_tables.len(),
            "page cleaned"
        );
        tables.extend(page_tables);
    }

    let chapter = CleanedChapter {
        chapter: chapter.chapter,
        title: chapter.title.clone(),
        content: content.trim().to_string(),
        tables,
    };
    Ok((chapter, page_total))
}

/// Runs the cleaning pipeline over an already opened document.
///
/// # Errors
///
/// Fails on invalid options or when a page cannot be read.
pub fn process_document(
    document: &impl PageSource,
    options: &ExtractOptions,
) -> Result<ProcessedDocument, ExtractError> {
    options.validate()?;
    let mut warnings = Vec::new();
    check_seed_order(&options.chapters, &mut warnings);

    let chapters = build_chapter_map(&options.chapters, document.page_count());
    let running = detect_running_lines(document, options, &mut warnings)?;

    info!(headers = ?running.headers, "detected common headers");
    info!(footers = ?running.footers, "detected common footers");
    info!("detected {} chapters", chapters.len());

    let mut cleaned_chapters = Vec::with_capacity(chapters.len());
    let mut pages_processed = 0;
    for chapter in &chapters {
        info!("processing chapter {}: {}", chapter.chapter, chapter.title);
        let (cleaned, pages) =
            process_chapter(document, chapter, &running, options, &mut warnings)?;
        pages_processed += pages;
        cleaned_chapters.push(cleaned);
    }

    Ok(ProcessedDocument {
        output: OutputDocument {
            source_file: options.input.display().to_string(),
            chapters: cleaned_chapters,
        },
        running_lines: running,
        pages_processed,
        warnings,
    })
}

/// Opens `options.input`, cleans it chapter by chapter and writes the JSON
/// result to `options.output` once everything succeeded.
///
/// # Errors
///
/// Fails when the PDF cannot be opened, a page cannot be read or the output
/// cannot be written.
pub fn extract_pdf_to_json(options: &ExtractOptions) -> Result<ExtractionReport, ExtractError> {
    options.validate()?;
    let document =
        PdfDocument::open(&options.input)?.with_min_table_cols(options.min_table_cols);
    let processed = process_document(&document, options)?;
    write_json(&options.output, &processed.output)?;
    info!(output = %options.output.display(), "extraction done");

    Ok(processed.report())
}

/// Renders an [`OutputDocument`] exactly as [`extract_pdf_to_json`] writes it.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn render_json(document: &OutputDocument) -> Result<String, ExtractError> {
    write_json_to_string(document)
}

/// Chapter ranges of `options.input` without cleaning any text.
///
/// # Errors
///
/// Fails on invalid options or when the PDF cannot be opened.
pub fn chapter_map_for_pdf(options: &ExtractOptions) -> Result<Vec<ChapterDescriptor>, ExtractError> {
    options.validate()?;
    let document = PdfDocument::open(&options.input)?;
    Ok(build_chapter_map(&options.chapters, document.page_count()))
}
