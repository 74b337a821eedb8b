// src/pipeline/whats_new.rs

//! "What's New" articles: link, title and editor/author line per release.

use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::Result;
use crate::models::{Page, ResultTable, SoftFailureLog};
use crate::services::navigator::{self, Document, Filter};
use crate::utils::{resolve, resolve_url};

use super::{Context, PipelineOutcome};

pub const HEADER: [&str; 3] = ["Article link", "Title", "Editor, Author"];

const PILCROW: char = '\u{b6}';

/// Fetch the index, then every linked article.
///
/// An unreachable article drops its row and records a soft failure; a layout
/// change on any fetched page aborts the run.
pub async fn run(context: &Context) -> Result<PipelineOutcome> {
    let index_url = resolve(&context.config.sites.docs_url, "whatsnew/")?;
    let index = context.fetcher.fetch(&index_url).await?;
    let links = article_links(&index)?;
    log::debug!("Found {} release articles", links.len());

    let mut articles = stream::iter(links)
        .map(|link| async move {
            let page = context.fetcher.fetch(&link).await;
            (link, page)
        })
        .buffered(context.concurrency());

    let mut table = ResultTable::new(HEADER);
    let mut soft_failures = SoftFailureLog::new();

    while let Some((link, page)) = articles.next().await {
        match page {
            Ok(page) => {
                let (title, authors) = article_row(&page)?;
                table.push([link, title, authors])?;
            }
            Err(error) => {
                log::debug!("{}", error);
                soft_failures.record(format!("Could not get a response for URL: {link}"));
            }
        }
    }

    Ok(PipelineOutcome::with_table(table, soft_failures))
}

/// Absolute article links listed on the index page, in document order.
pub fn article_links(index: &Page) -> Result<Vec<String>> {
    let document = Document::parse(index);
    let base = Url::parse(document.url())?;

    let section = document.require("section", &Filter::new().id("what-s-new-in-python"))?;
    let wrapper = navigator::require(section, "div", &Filter::new().class("toctree-wrapper"))?;

    navigator::find_all(wrapper, "li", &Filter::new().class("toctree-l1"))
        .into_iter()
        .map(|item| -> Result<String> {
            let anchor = navigator::require(item, "a", &Filter::new())?;
            let href = navigator::require_attr(anchor, "href")?;
            Ok(resolve_url(&base, href))
        })
        .collect()
}

/// Title (pilcrow removed) and definition list text (newlines as spaces).
pub fn article_row(article: &Page) -> Result<(String, String)> {
    let document = Document::parse(article);

    let heading = document.require("h1", &Filter::new())?;
    let title = navigator::text(heading).replace(PILCROW, "");

    let details = document.require("dl", &Filter::new())?;
    let authors = navigator::text(details).replace('\n', " ");

    Ok((title, authors))
}
