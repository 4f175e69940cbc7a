use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ExtractError;
use crate::table_detect::{DEFAULT_MIN_COLS, detect_tables_in_text};

/// One extracted table: first row is the header row, cells may be missing.
pub type RawTable = Vec<Vec<Option<String>>>;

/// Document-parsing collaborator. Page indices are 0-based.
pub trait PageSource {
    fn page_count(&self) -> usize;

    fn page_text(&self, index: usize) -> Result<&str, ExtractError>;

    fn page_tables(&self, index: usize) -> Result<Vec<RawTable>, ExtractError>;
}

pub(crate) fn check_page_index(index: usize, page_count: usize) -> Result<(), ExtractError> {
    if index < page_count {
        Ok(())
    } else {
        Err(ExtractError::PageOutOfRange {
            page: index,
            page_count,
        })
    }
}

/// Pages already held as text, e.g. from another extractor or a test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryDocument {
    pages: Vec<String>,
    explicit_tables: BTreeMap<usize, Vec<RawTable>>,
    min_table_cols: usize,
}

impl InMemoryDocument {
    #[must_use]
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            explicit_tables: BTreeMap::new(),
            min_table_cols: DEFAULT_MIN_COLS,
        }
    }

    #[must_use]
    pub fn with_min_table_cols(mut self, min_cols: usize) -> Self {
        self.min_table_cols = min_cols;
        self
    }

    /// Replaces text-based table detection on `index` with fixed tables.
    #[must_use]
    pub fn with_tables(mut self, index: usize, tables: Vec<RawTable>) -> Self {
        self.explicit_tables.insert(index, tables);
        self
    }
}

impl PageSource for InMemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<&str, ExtractError> {
        check_page_index(index, self.pages.len())?;
        Ok(&self.pages[index])
    }

    fn page_tables(&self, index: usize) -> Result<Vec<RawTable>, ExtractError> {
        check_page_index(index, self.pages.len())?;
        if let Some(tables) = self.explicit_tables.get(&index) {
            return Ok(tables.clone());
        }
        Ok(detect_tables_in_text(&self.pages[index], self.min_table_cols))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChapterSeed {
    pub chapter: u32,
    pub title: String,
    pub start_page: usize,
}

impl ChapterSeed {
    #[must_use]
    pub fn new(chapter: u32, title: impl Into<String>, start_page: usize) -> Self {
        Self {
            chapter,
            title: title.into(),
            start_page,
        }
    }
}

/// Inclusive 1-based page range assigned to a chapter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChapterDescriptor {
    pub chapter: u32,
    pub title: String,
    pub start_page: usize,
    pub end_page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFooterSets {
    pub headers: BTreeSet<String>,
    pub footers: BTreeSet<String>,
}

impl HeaderFooterSets {
    #[must_use]
    pub fn is_running_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        self.headers.contains(trimmed) || self.footers.contains(trimmed)
    }
}

/// One data row keyed by cleaned header, kept in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<(String, String)>,
}

impl TableRow {
    /// A repeated header keeps its first position and takes the new value.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        if let Some(slot) = self.cells.iter_mut().find(|(key, _)| *key == header) {
            slot.1 = value;
        } else {
            self.cells.push((header, value));
        }
    }

    #[must_use]
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for TableRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Self::default();
        for (header, value) in iter {
            row.insert(header, value);
        }
        row
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableRecord {
    pub table_name: String,
    pub data: Vec<TableRow>,
}

impl TableRecord {
    #[must_use]
    pub fn table_name(page_number: usize, index: usize) -> String {
        format!("Table on Page {page_number}, Index {index}")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CleanedChapter {
    pub chapter: u32,
    pub title: String,
    pub content: String,
    pub tables: Vec<TableRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutputDocument {
    pub source_file: String,
    pub chapters: Vec<CleanedChapter>,
}
