// src/pipeline/pep.rs

//! PEP status counts.
//!
//! Every PEP listed in the numerical index is fetched individually and the
//! status on its own page is counted. That status is also checked against the
//! preview code shown in the index; disagreements are reported as soft
//! failures and never change the counts.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Page, ResultTable, SoftFailureLog, StatusExpectations};
use crate::services::navigator::{self, Document, Filter};
use crate::utils::resolve_url;

use super::{Context, PipelineOutcome};

pub const HEADER: [&str; 2] = ["Status", "Count"];
pub const TOTAL_LABEL: &str = "Total";

const STATUS_LABEL: &str = "Status";

/// One row of the numerical index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PepEntry {
    /// Status abbreviation from the index, type glyph removed (may be empty)
    pub preview_code: String,
    /// Absolute link to the PEP page
    pub link: String,
}

/// Per-status counts plus the number of index rows scanned.
#[derive(Debug, Default)]
pub struct StatusTally {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl StatusTally {
    pub fn new(total: usize) -> Self {
        Self {
            counts: BTreeMap::new(),
            total,
        }
    }

    pub fn record(&mut self, status: &str) {
        *self.counts.entry(status.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, status: &str) -> usize {
        self.counts.get(status).copied().unwrap_or(0)
    }

    /// Statuses sorted by name, then the `Total` row.
    pub fn into_table(self) -> Result<ResultTable> {
        let mut table = ResultTable::new(HEADER);
        for (status, count) in self.counts {
            table.push([status, count.to_string()])?;
        }
        table.push([TOTAL_LABEL.to_string(), self.total.to_string()])?;
        Ok(table)
    }
}

pub async fn run(context: &Context) -> Result<PipelineOutcome> {
    let peps_url = &context.config.sites.peps_url;
    let index = context.fetcher.fetch(peps_url).await?;
    let entries = index_entries(&index)?;
    log::debug!("Found {} PEPs in the numerical index", entries.len());

    let mut tally = StatusTally::new(entries.len());
    let mut soft_failures = SoftFailureLog::new();

    let mut pages = stream::iter(entries)
        .map(|entry| async move {
            let page = context.fetcher.fetch(&entry.link).await;
            (entry, page)
        })
        .buffered(context.concurrency());

    while let Some((entry, page)) = pages.next().await {
        let page = match page {
            Ok(page) => page,
            Err(error) => {
                log::debug!("{}", error);
                soft_failures.record(format!("Could not get a response for URL: {}", entry.link));
                continue;
            }
        };

        let status = observed_status(&page)?;
        tally.record(&status);
        if let Some(message) = check_status(&context.expectations, &entry, &status)? {
            soft_failures.record(message);
        }
    }

    Ok(PipelineOutcome::with_table(tally.into_table()?, soft_failures))
}

/// Rows of the numerical index table, in document order.
pub fn index_entries(index: &Page) -> Result<Vec<PepEntry>> {
    let document = Document::parse(index);
    let base = Url::parse(document.url())?;

    let section = document.require("section", &Filter::new().id("numerical-index"))?;
    let body = navigator::require(section, "tbody", &Filter::new())?;

    navigator::find_all(body, "tr", &Filter::new())
        .into_iter()
        .map(|row| -> Result<PepEntry> {
            let first_cell = navigator::require(row, "td", &Filter::new())?;
            let preview_code = navigator::text(first_cell).chars().skip(1).collect();
            let anchor = navigator::require(row, "a", &Filter::new())?;
            let href = navigator::require_attr(anchor, "href")?;
            Ok(PepEntry {
                preview_code,
                link: resolve_url(&base, href),
            })
        })
        .collect()
}

/// Status field of a single PEP page.
pub fn observed_status(page: &Page) -> Result<String> {
    let document = Document::parse(page);
    Ok(navigator::field_value(document.root(), STATUS_LABEL)?)
}

/// Mismatch message when `status` is not accepted for the entry's preview
/// code. An unknown preview code is an error.
pub fn check_status(
    expectations: &StatusExpectations,
    entry: &PepEntry,
    status: &str,
) -> Result<Option<String>> {
    let accepted = expectations
        .accepted(&entry.preview_code)
        .ok_or_else(|| AppError::UnknownPreviewCode {
            code: entry.preview_code.clone(),
            link: entry.link.clone(),
        })?;

    if accepted.contains(status) {
        return Ok(None);
    }
    Ok(Some(format!(
        "Mismatched statuses:\n{}\nStatus on page: {}\nExpected statuses: {}",
        entry.link, status, accepted
    )))
}
