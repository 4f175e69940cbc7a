use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExtractError;
use crate::model::OutputDocument;

/// Writes the document as 2-space indented UTF-8 JSON, replacing `path`.
pub(crate) fn write_json(path: &Path, document: &OutputDocument) -> Result<(), ExtractError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_json_to_string(document: &OutputDocument) -> Result<String, ExtractError> {
    Ok(serde_json::to_string_pretty(document)?)
}
