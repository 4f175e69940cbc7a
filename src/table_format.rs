use std::sync::LazyLock;

use regex::Regex;

use crate::model::TableRow;
use crate::options::CellLineBreaks;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]+").expect("valid line break regex"));
// Historical cell cleanup: matches the letter `n`, not a newline.
static LEGACY_CELL_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[n\r]+").expect("valid legacy cell regex"));

fn clean_header(index: usize, header: Option<&str>) -> String {
    let cleaned = header
        .map(|text| LINE_BREAKS.replace_all(text, " ").trim().to_string())
        .unwrap_or_default();
    if cleaned.is_empty() {
        format!("column-{index}")
    } else {
        cleaned
    }
}

fn clean_cell(cell: Option<&str>, mode: CellLineBreaks) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    let pattern = match mode {
        CellLineBreaks::Legacy => &*LEGACY_CELL_BREAKS,
        CellLineBreaks::Newlines => &*LINE_BREAKS,
    };
    pattern.replace_all(cell, " ").trim().to_string()
}

/// Maps data rows onto the cleaned header row.
///
/// Returns `None` when the table has no rows or every data row is blank.
#[must_use]
pub fn format_table(table: &[Vec<Option<String>>], mode: CellLineBreaks) -> Option<Vec<TableRow>> {
    let (header_row, data_rows) = table.split_first()?;
    let headers = header_row
        .iter()
        .enumerate()
        .map(|(index, header)| clean_header(index, header.as_deref()))
        .collect::<Vec<_>>();

    let rows = data_rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let cell = row.get(index).and_then(Option::as_deref);
                    (header.clone(), clean_cell(cell, mode))
                })
                .collect::<TableRow>()
        })
        .filter(|row| !row.is_blank())
        .collect::<Vec<_>>();

    if rows.is_empty() { None } else { Some(rows) }
}
