use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::RowSource;
use crate::common::RawRow;

// -- 📂 FileSourceConfig lives here, next to the FileSource that actually uses it.
/// 📂 Where the rows file is and how it is laid out.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FileSourceConfig {
    pub file_name: String,
    #[serde(default)]
    pub format: RowFormat,
}

/// 🧾 On-disk layout of the rows.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowFormat {
    /// `[ {...}, {...} ]`
    #[default]
    JsonArray,
    /// One object per line. Blank lines are fine.
    Ndjson,
}

/// 📂 Reads a whole rows file in one go.
///
/// Anything that isn't a JSON object (a stray number, a broken NDJSON line) is
/// logged and skipped. One weird row doesn't get to ruin the batch for everyone.
/// A missing file or a JSON array that doesn't parse at all is an error though,
/// because at that point there is no batch.
#[derive(Debug)]
pub struct FileSource {
    config: FileSourceConfig,
}

impl FileSource {
    pub fn new(config: FileSourceConfig) -> Self {
        Self { config }
    }
}

impl RowSource for FileSource {
    fn load_rows(&mut self) -> Result<Vec<RawRow>> {
        let path = Path::new(&self.config.file_name);
        let contents = std::fs::read_to_string(path).with_context(|| {
            format!(
                "💀 Could not read the rows file '{}'. Check that it exists and that \
                 relative paths are relative to where you think they are.",
                path.display()
            )
        })?;

        let rows = match self.config.format {
            RowFormat::JsonArray => parse_json_array(&contents)
                .with_context(|| format!("💀 '{}' is not a JSON array of rows", path.display()))?,
            RowFormat::Ndjson => parse_ndjson(&contents),
        };

        debug!("📂 read {} rows from '{}'", rows.len(), path.display());
        Ok(rows)
    }
}

fn parse_json_array(contents: &str) -> Result<Vec<RawRow>> {
    let entries: Vec<Value> = serde_json::from_str(contents)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(row) => Some(row),
            not_a_row => {
                warn!("⚠️ skipping entry {} of the rows array: expected an object, got {}", index, not_a_row);
                None
            }
        })
        .collect())
}

fn parse_ndjson(contents: &str) -> Vec<RawRow> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(row)) => Some(row),
            Ok(not_a_row) => {
                warn!("⚠️ skipping line {}: expected an object, got {}", index + 1, not_a_row);
                None
            }
            Err(err) => {
                warn!("⚠️ skipping line {}: not valid JSON ({})", index + 1, err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn a_file_with(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("💀 temp file should be creatable");
        file.write_all(contents.as_bytes())
            .expect("💀 temp file should be writable");
        file
    }

    fn source_for(file: &tempfile::NamedTempFile, format: RowFormat) -> FileSource {
        FileSource::new(FileSourceConfig {
            file_name: file.path().display().to_string(),
            format,
        })
    }

    #[test]
    fn the_one_where_a_json_array_becomes_rows() -> Result<()> {
        let file = a_file_with(r#"[{"Client": "Acme"}, 42, {"Client": "Zeta"}]"#);
        let rows = source_for(&file, RowFormat::JsonArray).load_rows()?;

        assert_eq!(rows.len(), 2, "the 42 is not a row and gets skipped");
        assert_eq!(rows[1].get("Client").and_then(Value::as_str), Some("Zeta"));
        Ok(())
    }

    #[test]
    fn the_one_where_ndjson_survives_a_bad_line() -> Result<()> {
        let file = a_file_with("{\"Status\": \"Open\"}\n\nthis is not json, kevin\n[1,2]\n{\"Status\": \"Closed\"}\n");
        let rows = source_for(&file, RowFormat::Ndjson).load_rows()?;

        let statuses: Vec<&str> = rows
            .iter()
            .filter_map(|row| row.get("Status").and_then(Value::as_str))
            .collect();
        assert_eq!(statuses, vec!["Open", "Closed"]);
        Ok(())
    }

    #[test]
    fn the_one_where_a_broken_array_is_an_error() {
        let file = a_file_with("[{\"Client\": ");
        assert!(source_for(&file, RowFormat::JsonArray).load_rows().is_err());
    }

    #[test]
    fn the_one_where_the_file_is_not_there() {
        let mut source = FileSource::new(FileSourceConfig {
            file_name: "/definitely/not/here/tickets.json".to_string(),
            format: RowFormat::JsonArray,
        });
        let err = source.load_rows().expect_err("💀 missing file should be an error");
        assert!(err.to_string().contains("/definitely/not/here/tickets.json"));
    }
}
