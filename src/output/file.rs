// src/output/file.rs

//! CSV file sink.
//!
//! Unix dialect: every field double-quoted, embedded quotes doubled, rows
//! terminated by `\n`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::models::ResultTable;
use crate::pipeline::Mode;

use super::{OutputContext, TableSink};

const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Writes `<mode>_<timestamp>.csv` into the results directory.
pub struct CsvFileWriter;

impl CsvFileWriter {
    /// Write the table and return the created file path.
    pub fn write_to_dir(&self, table: &ResultTable, mode: Mode, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let file_name = format!("{}_{}.csv", mode, Local::now().format(DATETIME_FORMAT));
        let path = dir.join(file_name);

        let mut out = BufWriter::new(File::create(&path)?);
        write_csv(&mut out, table)?;
        out.flush()?;
        Ok(path)
    }
}

impl TableSink for CsvFileWriter {
    fn emit(&self, table: &ResultTable, context: &OutputContext) -> Result<()> {
        let path = self.write_to_dir(table, context.mode, &context.results_dir)?;
        log::info!("Results file saved: {}", path.display());
        Ok(())
    }
}

fn write_field<W: Write>(w: &mut W, field: &str) -> io::Result<()> {
    write!(w, "\"{}\"", field.replace('"', "\"\""))
}

/// Write header and rows to any writer.
pub fn write_csv<W: Write>(w: &mut W, table: &ResultTable) -> io::Result<()> {
    for row in table.iter_all() {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                w.write_all(b",")?;
            }
            write_field(w, cell)?;
        }
        w.write_all(b"\n")?;
    }
    Ok(())
}
