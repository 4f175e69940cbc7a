//! Line-level cleanup of one page of extracted text.
//!
//! The rules run in a fixed order, each on the output of the previous one:
//! running header/footer lines are dropped, words hyphenated across a line
//! break are rejoined, soft-wrapped lines are merged into paragraphs, and
//! whitespace is normalized. Paragraph breaks and list items keep their
//! line break; everything else ends up on a single line.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::HeaderFooterSets;

static HYPHENATED_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*-\s*\n\s*(\w+)").expect("valid hyphenation regex"));
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.(\s|$)").expect("valid numbered item regex"));
static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•●○◦▪■·*–-](\s|$)").expect("valid bullet item regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[must_use]
pub fn clean_page_text(text: &str, running: &HeaderFooterSets) -> String {
    // Merging can assemble a wrapped running head into one strippable line,
    // so the rules repeat until nothing changes. On normalized text every
    // changing pass shortens the text or removes a line break.
    let mut cleaned = clean_once(text, running);
    loop {
        let next = clean_once(&cleaned, running);
        if next == cleaned {
            return cleaned;
        }
        cleaned = next;
    }
}

fn clean_once(text: &str, running: &HeaderFooterSets) -> String {
    let text = strip_running_lines(text, running);
    let text = dehyphenate(&text);
    let text = merge_soft_breaks(&text);
    normalize_whitespace(&text)
}

/// Drops lines whose trimmed text is a known header or footer.
#[must_use]
pub fn strip_running_lines(text: &str, running: &HeaderFooterSets) -> String {
    text.split('\n')
        .filter(|line| !running.is_running_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins `cate-\ngory` into `category`.
#[must_use]
pub fn dehyphenate(text: &str) -> String {
    HYPHENATED_BREAK.replace_all(text, "${1}${2}").into_owned()
}

#[must_use]
pub fn is_numbered_item(line: &str) -> bool {
    NUMBERED_ITEM.is_match(line)
}

#[must_use]
pub fn is_bullet_item(line: &str) -> bool {
    BULLET_ITEM.is_match(line)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn keeps_break(current: &str, next: &str) -> bool {
    is_blank(current) || is_blank(next) || is_bullet_item(next) || is_numbered_item(next)
}

/// Replaces soft line breaks with a space. A break survives when either
/// side is blank or the next line opens a bullet or numbered item.
#[must_use]
pub fn merge_soft_breaks(text: &str) -> String {
    let lines = text.split('\n').collect::<Vec<_>>();
    let mut merged = String::with_capacity(text.len());

    for (index, line) in lines.iter().enumerate() {
        merged.push_str(line);
        let Some(next) = lines.get(index + 1) else {
            break;
        };
        merged.push(if keeps_break(line, next) { '\n' } else { ' ' });
    }

    merged
}

/// Collapses each whitespace run: two or more newlines become a paragraph
/// break, one newline stays a line break, anything else becomes one space.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text, |caps: &Captures<'_>| {
            match caps[0].matches('\n').count() {
                0 => " ",
                1 => "\n",
                _ => "\n\n",
            }
        })
        .trim()
        .to_string()
}
