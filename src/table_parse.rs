use std::collections::HashMap;

/// Splits a text line into cells on tabs or runs of two or more spaces.
pub(crate) fn split_row_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut pending_spaces = 0_usize;

    let flush = |current: &mut String, cells: &mut Vec<String>| {
        let cell = current.trim();
        if !cell.is_empty() {
            cells.push(cell.to_string());
        }
        current.clear();
    };

    for ch in trimmed.chars() {
        match ch {
            '\t' => {
                flush(&mut current, &mut cells);
                pending_spaces = 0;
            }
            ch if ch.is_whitespace() => pending_spaces += 1,
            _ => {
                if pending_spaces >= 2 {
                    flush(&mut current, &mut cells);
                } else if pending_spaces == 1 {
                    current.push(' ');
                }
                pending_spaces = 0;
                current.push(ch);
            }
        }
    }
    flush(&mut current, &mut cells);

    cells
}

pub(crate) fn modal_width(rows: &[Vec<String>]) -> usize {
    let mut freq = HashMap::new();
    for width in rows.iter().map(Vec::len) {
        *freq.entry(width).or_insert(0_usize) += 1;
    }

    freq.into_iter()
        .max_by_key(|(width, count)| (*count, *width))
        .map_or(0, |(width, _)| width)
}
