use crate::model::RawTable;
use crate::table_parse::{modal_width, split_row_cells};

pub(crate) const DEFAULT_MIN_COLS: usize = 2;
pub(crate) const LOW_CONFIDENCE_THRESHOLD: f32 = 0.60;

#[allow(clippy::cast_precision_loss)]
fn table_confidence(rows: &[Vec<String>]) -> f32 {
    if rows.len() < 2 {
        return 0.0;
    }

    let modal = modal_width(rows);
    if modal == 0 {
        return 0.0;
    }

    let consistent =
        rows.iter().filter(|row| row.len() == modal).count() as f32 / rows.len() as f32;
    let max_width = rows.iter().map(Vec::len).max().unwrap_or(modal);
    let min_width = rows.iter().map(Vec::len).min().unwrap_or(modal);
    let uniformity = 1.0 - ((max_width - min_width) as f32 / max_width as f32);

    (consistent * 0.75 + uniformity * 0.25).clamp(0.0, 1.0)
}

fn into_raw_table(rows: Vec<Vec<String>>) -> RawTable {
    rows.into_iter()
        .map(|row| row.into_iter().map(Some).collect())
        .collect()
}

/// Finds column-aligned blocks of consecutive lines in a page's text.
///
/// A block needs at least two rows of `min_cols` cells and a consistent
/// shape; ragged blocks below [`LOW_CONFIDENCE_THRESHOLD`] are dropped.
pub(crate) fn detect_tables_in_text(text: &str, min_cols: usize) -> Vec<RawTable> {
    let min_cols = min_cols.max(DEFAULT_MIN_COLS);
    let mut tables = Vec::new();
    let mut current_rows: Vec<Vec<String>> = Vec::new();

    let flush = |rows: &mut Vec<Vec<String>>, tables: &mut Vec<RawTable>| {
        if rows.len() >= 2 && table_confidence(rows) >= LOW_CONFIDENCE_THRESHOLD {
            tables.push(into_raw_table(std::mem::take(rows)));
        } else {
            rows.clear();
        }
    };

    for line in text.lines() {
        let cells = split_row_cells(line);
        if cells.len() >= min_cols {
            current_rows.push(cells);
        } else {
            flush(&mut current_rows, &mut tables);
        }
    }
    flush(&mut current_rows, &mut tables);

    tables
}
