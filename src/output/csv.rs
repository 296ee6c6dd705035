//! Append-mode CSV sink
//!
//! Every run starts by writing the header row, even when the file already holds
//! rows from earlier runs. Rows are rendered by `Product::to_csv_row`. The header
//! and each row are flushed as soon as they are written, so an unwritable target
//! fails at setup and a killed run keeps every row written before it died.

use crate::product::CSV_HEADER;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes serialized products to an append-only byte sink
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: BufWriter<W>,
    rows: u64,
}

impl CsvSink<File> {
    /// Opens `path` for appending, creating it if needed, and writes the header
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Self::new(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps `writer` and writes the header row
    pub fn new(writer: W) -> io::Result<Self> {
        let mut writer = BufWriter::new(writer);
        writeln!(writer, "{}", CSV_HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Appends one already-rendered row
    pub fn write_row(&mut self, row: &str) -> io::Result<()> {
        self.writer.write_all(row.as_bytes())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flushes anything left and returns the underlying writer
    pub fn finish(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
