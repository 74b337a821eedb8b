// src/pipeline/latest_versions.rs

//! Documentation versions from the sidebar "All versions" list.

use regex::Regex;

use crate::error::{LookupError, Result};
use crate::models::{Page, ResultTable, SoftFailureLog};
use crate::services::navigator::{self, Document, Filter};

use super::{Context, PipelineOutcome};

pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

const ALL_VERSIONS_MARKER: &str = "All versions";
const VERSION_PATTERN: &str = r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)";

/// Single fetch of the documentation root; no per-item requests.
pub async fn run(context: &Context) -> Result<PipelineOutcome> {
    let page = context.fetcher.fetch(&context.config.sites.docs_url).await?;
    let table = version_table(&page)?;
    Ok(PipelineOutcome::with_table(table, SoftFailureLog::new()))
}

/// One row per anchor of the version list, in document order.
pub fn version_table(page: &Page) -> Result<ResultTable> {
    let pattern = Regex::new(VERSION_PATTERN)?;
    let document = Document::parse(page);

    let sidebar = document.require("div", &Filter::new().class("sphinxsidebarwrapper"))?;
    let versions = navigator::find_all(sidebar, "ul", &Filter::new())
        .into_iter()
        .find(|list| navigator::text(*list).contains(ALL_VERSIONS_MARKER))
        .ok_or_else(|| LookupError {
            tag: "ul".to_string(),
            filter: format!("{{text contains {ALL_VERSIONS_MARKER:?}}}"),
        })?;

    let mut table = ResultTable::new(HEADER);
    for anchor in navigator::find_all(versions, "a", &Filter::new()) {
        let link = navigator::require_attr(anchor, "href")?;
        let (version, status) = split_version(&pattern, &navigator::text(anchor));
        table.push([link.to_string(), version, status])?;
    }
    Ok(table)
}

/// `"Python 3.11 (stable)"` gives `("3.11", "stable")`; anything else is kept
/// whole as the version with an empty status.
pub fn split_version(pattern: &Regex, text: &str) -> (String, String) {
    match pattern.captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}
