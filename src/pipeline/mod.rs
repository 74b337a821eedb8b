//! Pipeline entry points.
//!
//! - `whats_new`: release notes index, one row per "What's New" article
//! - `latest_versions`: documentation versions listed in the sidebar
//! - `download`: PDF (A4) documentation archive
//! - `pep`: PEP status counts, cross-checked against the index

pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, ResultTable, SoftFailureLog, StatusExpectations};
use crate::services::PageFetcher;

/// Pipeline selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Mode {
    /// Release notes articles
    WhatsNew,
    /// Documentation versions and their status
    LatestVersions,
    /// PDF (A4) documentation archive
    Download,
    /// PEP status counts
    Pep,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared state of one pipeline run.
pub struct Context {
    pub config: Arc<Config>,
    pub fetcher: PageFetcher,
    pub expectations: StatusExpectations,
}

impl Context {
    pub fn new(config: Arc<Config>, fetcher: PageFetcher) -> Self {
        Self {
            config,
            fetcher,
            expectations: StatusExpectations::default(),
        }
    }

    /// Worker pool size for per-item fetch loops.
    pub(crate) fn concurrency(&self) -> usize {
        self.config.http.max_concurrent.max(1)
    }
}

/// What a pipeline produced.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    /// Table for the output sink; `None` for pipelines without tabular output
    pub table: Option<ResultTable>,

    /// Anomalies recorded without aborting the run
    pub soft_failures: SoftFailureLog,

    /// Files written as a side effect
    pub saved_files: Vec<PathBuf>,
}

impl PipelineOutcome {
    pub fn with_table(table: ResultTable, soft_failures: SoftFailureLog) -> Self {
        Self {
            table: Some(table),
            soft_failures,
            saved_files: Vec::new(),
        }
    }
}

/// Run the pipeline for `mode`.
pub async fn run(mode: Mode, context: &Context) -> Result<PipelineOutcome> {
    log::debug!("Running pipeline: {}", mode);
    match mode {
        Mode::WhatsNew => whats_new::run(context).await,
        Mode::LatestVersions => latest_versions::run(context).await,
        Mode::Download => download::run(context).await,
        Mode::Pep => pep::run(context).await,
    }
}
