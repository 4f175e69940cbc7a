use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::UTF_16BE;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use crate::error::ExtractError;
use crate::model::{PageSource, RawTable, check_page_index};
use crate::table_detect::{DEFAULT_MIN_COLS, detect_tables_in_text};
use crate::table_parse::split_row_cells;

/// A PDF opened once, with the text of every page extracted up front.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pages: Vec<String>,
    min_table_cols: usize,
}

impl PdfDocument {
    /// # Errors
    ///
    /// Fails with [`ExtractError::PdfLoad`] when the file is missing or is not
    /// a readable PDF.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let document = Document::load(path)?;
        let whole_text = pdf_extract::extract_text(path)
            .map_err(|error| debug!(%error, "pdf-extract failed; using content streams"))
            .ok();
        Ok(Self::from_parts(&document, whole_text.as_deref()))
    }

    /// # Errors
    ///
    /// Fails with [`ExtractError::PdfLoad`] when the bytes are not a readable PDF.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        let document = Document::load_mem(bytes)?;
        let whole_text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|error| debug!(%error, "pdf-extract failed; using content streams"))
            .ok();
        Ok(Self::from_parts(&document, whole_text.as_deref()))
    }

    #[must_use]
    pub fn with_min_table_cols(mut self, min_cols: usize) -> Self {
        self.min_table_cols = min_cols;
        self
    }

    fn from_parts(document: &Document, whole_text: Option<&str>) -> Self {
        let page_ids = document.get_pages();
        let split_pages = whole_text
            .map(split_text_into_pages)
            .filter(|pages| pages.len() == page_ids.len());

        let pages = page_ids
            .iter()
            .enumerate()
            .map(|(index, (page_no, page_id))| {
                let mut candidates = Vec::new();
                if let Some(text) = split_pages.as_ref().and_then(|pages| pages.get(index)) {
                    candidates.push(text.clone());
                }
                if let Some(text) = extract_text_from_page_content(document, *page_id) {
                    candidates.push(text);
                }
                if let Ok(text) = document.extract_text(&[*page_no]) {
                    candidates.push(text);
                }
                choose_best_text(candidates)
            })
            .collect();

        Self {
            pages,
            min_table_cols: DEFAULT_MIN_COLS,
        }
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<&str, ExtractError> {
        check_page_index(index, self.pages.len())?;
        Ok(&self.pages[index])
    }

    fn page_tables(&self, index: usize) -> Result<Vec<RawTable>, ExtractError> {
        let text = self.page_text(index)?;
        Ok(detect_tables_in_text(text, self.min_table_cols))
    }
}

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_decoding_broken(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t' | '\u{000C}'))
        .count();

    replacement * 8 > total || control * 5 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    let utf16_hint = bytes.starts_with(&[0xFE, 0xFF])
        || encoding.is_some_and(|name| {
            let lower = name.to_ascii_lowercase();
            ["utf16", "ucs2", "identity-h", "unicode"]
                .iter()
                .any(|marker| lower.contains(marker))
        });
    if utf16_hint {
        let body = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(body);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Prefers text with many readable words spread over several lines, and
/// among equals the one that kept column gaps.
#[allow(clippy::cast_possible_wrap)]
fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut lines = 0_i64;
    let mut aligned = 0_i64;
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        lines += 1;
        if split_row_cells(line).len() >= 2 {
            aligned += 1;
        }
    }
    let words = text
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .count() as i64;
    let broken_penalty = if looks_decoding_broken(text) { 10_000 } else { 0 };

    words * 2 + lines + aligned - broken_penalty
}

fn choose_best_text(candidates: Vec<String>) -> String {
    candidates
        .into_iter()
        .max_by_key(|text| extraction_quality_score(text))
        .unwrap_or_default()
}

fn extract_text_from_page_content(document: &Document, page_id: ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => text.push_str(&decode_pdf_bytes(encoding, bytes)),
                Object::Array(items) => collect_text(text, encoding, items),
                // Large negative kerning in TJ arrays separates words.
                Object::Integer(value) if *value < -100 => text.push(' '),
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                current_encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|font_name| encodings.get(font_name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    if !current.trim().is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
