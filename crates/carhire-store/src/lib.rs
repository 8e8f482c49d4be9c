//! Flat table store
//!
//! One UTF-8 text file per table, one record per line, fields separated by
//! `;`. The first line is always a header: skipped on read, written on every
//! save. Saves rewrite the whole table; there is no row-level write.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use carhire_types::Result;
use tracing::{debug, warn};

/// Field delimiter used by every table
pub const DELIMITER: u8 = b';';

/// A raw table row, one string per column
pub type Row = Vec<String>;

/// Static description of one table file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    /// Table name, also the file stem
    pub name: &'static str,
    /// Header emitted as the first line on save
    pub header: &'static [&'static str],
}

impl TableDef {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name)
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Directory holding the table files
#[derive(Debug, Clone)]
pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path_of(&self, table: &TableDef) -> PathBuf {
        self.root.join(table.file_name())
    }

    /// Load every data row of a table in file order.
    ///
    /// A missing file reads as an empty table. Trailing empty fields are kept.
    pub fn load_rows(&self, table: &TableDef) -> Result<Vec<Row>> {
        Ok(self
            .load_numbered_rows(table)?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }

    /// Like [`load_rows`](Self::load_rows), pairing each row with its 1-based
    /// line number in the file, for diagnostics. Blank lines are skipped;
    /// lines that are not valid UTF-8 are skipped with a warning.
    pub fn load_numbered_rows(&self, table: &TableDef) -> Result<Vec<(u64, Row)>> {
        let path = self.path_of(table);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(table = table.name, "table file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    rows.push((line, record.iter().map(str::to_string).collect()));
                }
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    warn!(table = table.name, line, error = %e, "skipping unreadable row");
                }
            }
        }

        debug!(table = table.name, rows = rows.len(), "loaded table");
        Ok(rows)
    }

    /// Replace the whole table with `rows`.
    ///
    /// Rows go to a sibling temporary file that is renamed over the table, so
    /// readers see either the old or the new contents.
    pub fn save_rows(&self, table: &TableDef, rows: &[Row]) -> Result<()> {
        let path = self.path_of(table);
        let tmp_path = self.root.join(format!(".{}.tmp", table.file_name()));

        {
            let file = File::create(&tmp_path)?;
            let mut writer = csv::WriterBuilder::new()
                .delimiter(DELIMITER)
                .flexible(true)
                .quote_style(csv::QuoteStyle::Never)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(BufWriter::new(file));

            writer.write_record(table.header)?;
            for row in rows {
                writer.write_record(row)?;
            }
            let mut inner = writer
                .into_inner()
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            inner.flush()?;
            inner.get_ref().sync_all()?;
        }

        fs::rename(&tmp_path, &path)?;
        debug!(table = table.name, rows = rows.len(), "saved table");
        Ok(())
    }
}
