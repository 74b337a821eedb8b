//! Output sinks for result tables.
//!
//! - `Lines`: one row per line on stdout (default)
//! - `Pretty`: aligned box table on stdout
//! - `File`: CSV file in the results directory

mod console;
mod file;

use std::path::PathBuf;

use crate::error::Result;
use crate::models::ResultTable;
use crate::pipeline::Mode;

pub use console::{LinePrinter, PrettyPrinter, render_lines, render_pretty};
pub use file::{CsvFileWriter, write_csv};

/// Output selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// One row per line
    #[default]
    #[cfg_attr(feature = "cli", value(skip))]
    Lines,
    /// Aligned table
    Pretty,
    /// CSV file
    File,
}

/// Run details a sink may need.
#[derive(Debug, Clone)]
pub struct OutputContext {
    pub mode: Mode,
    pub results_dir: PathBuf,
}

/// A destination for a finished table.
pub trait TableSink {
    fn emit(&self, table: &ResultTable, context: &OutputContext) -> Result<()>;
}

/// Sink for the selected format.
pub fn sink_for(format: OutputFormat) -> Box<dyn TableSink> {
    match format {
        OutputFormat::Lines => Box::new(LinePrinter),
        OutputFormat::Pretty => Box::new(PrettyPrinter),
        OutputFormat::File => Box::new(CsvFileWriter),
    }
}
