// src/pipeline/download.rs

//! PDF (A4) documentation archive download.

use regex::Regex;
use url::Url;

use crate::error::Result;
use crate::models::Page;
use crate::services::navigator::{self, Document, Filter};
use crate::utils::{last_path_segment, resolve, resolve_url};

use super::{Context, PipelineOutcome};

const ARCHIVE_PATTERN: &str = r".+pdf-a4\.zip$";
const LINK_TEXT_MARKER: &str = "Download";

/// Save every matching archive into the downloads directory.
///
/// Produces no table. If the downloads page itself cannot be fetched the run
/// ends quietly with nothing saved.
pub async fn run(context: &Context) -> Result<PipelineOutcome> {
    let downloads_dir = context.config.paths.downloads_path();
    tokio::fs::create_dir_all(&downloads_dir).await?;

    let downloads_url = resolve(&context.config.sites.docs_url, "download.html")?;
    let page = match context.fetcher.fetch(&downloads_url).await {
        Ok(page) => page,
        Err(error) => {
            log::debug!("{}", error);
            return Ok(PipelineOutcome::default());
        }
    };

    let mut outcome = PipelineOutcome::default();
    for archive_url in archive_links(&page)? {
        let body = context.fetcher.fetch_bytes(&archive_url).await?;
        let archive_path = downloads_dir.join(last_path_segment(&archive_url));
        tokio::fs::write(&archive_path, &body).await?;

        log::info!("Archive downloaded and saved: {}", archive_path.display());
        outcome.saved_files.push(archive_path);
    }

    Ok(outcome)
}

/// Absolute URLs of A4 PDF archives whose link text says "Download".
pub fn archive_links(page: &Page) -> Result<Vec<String>> {
    let pattern = Regex::new(ARCHIVE_PATTERN)?;
    let document = Document::parse(page);
    let base = Url::parse(document.url())?;

    let table = document.require("table", &Filter::new().class("docutils"))?;
    let mut links = Vec::new();
    for anchor in navigator::find_all(table, "a", &Filter::new().pattern("href", pattern)) {
        if !navigator::text(anchor).contains(LINK_TEXT_MARKER) {
            continue;
        }
        let href = navigator::require_attr(anchor, "href")?;
        links.push(resolve_url(&base, href));
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const PAGE: &str = r#"
        <html><body>
        <table class="docutils align-default">
          <tr><th>Format</th><th>Packed as .zip</th><th>Packed as .tar.bz2</th></tr>
          <tr><td>PDF (US-Letter paper size)</td>
              <td><a href="archives/python-3.13-docs-pdf-letter.zip">Download</a> (ca. 17 MiB)</td>
              <td><a href="archives/python-3.13-docs-pdf-letter.tar.bz2">Download</a></td></tr>
          <tr><td>PDF (A4 paper size)</td>
              <td><a href="archives/python-3.13-docs-pdf-a4.zip">Download</a> (ca. 17 MiB)</td>
              <td><a href="archives/python-3.13-docs-pdf-a4.tar.bz2">Download</a></td></tr>
          <tr><td>Mirror</td><td><a href="archives/old-pdf-a4.zip">mirror</a></td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_archive_links_match_suffix_and_text() {
        let page = Page::new(
            "https://docs.python.org/3/download.html",
            PAGE.as_bytes().to_vec(),
            "utf-8",
        );
        assert_eq!(
            archive_links(&page).unwrap(),
            ["https://docs.python.org/3/archives/python-3.13-docs-pdf-a4.zip"]
        );
    }

    #[test]
    fn test_archive_links_requires_table() {
        let page = Page::new(
            "https://docs.python.org/3/download.html",
            b"<html><body><table class=\"other\"></table></body></html>".to_vec(),
            "utf-8",
        );
        let err = archive_links(&page).unwrap_err();
        assert!(matches!(err, AppError::Lookup(ref e) if e.tag == "table"));
    }
}
