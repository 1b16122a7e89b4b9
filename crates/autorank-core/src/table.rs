//! Plain CSV table loading.
//!
//! Rows are read with RFC 4180 quoting, without header handling and with
//! flexible record lengths; column counts are checked by the catalog builder,
//! not here. Unquoted lines split on every comma. A field that opens a quote
//! and never closes it absorbs the rest of the file, newlines included.
//!
//! Only blank lines are skipped. A line of empty fields such as `,,` is a row.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type CsvRow = Vec<String>;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// All non-blank rows of a CSV file, header included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    rows: Vec<CsvRow>,
}

impl CsvTable {
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn parse(text: &str) -> Result<Self, TableError> {
        Self::from_reader(text.as_bytes())
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            // Whitespace-only line.
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[CsvRow] {
        &self.rows
    }

    #[must_use]
    pub fn header(&self) -> Option<&CsvRow> {
        self.rows.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<CsvRow> {
        self.rows
    }
}
