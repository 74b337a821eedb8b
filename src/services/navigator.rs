// src/services/navigator.rs

//! Document tree queries.
//!
//! [`require`] is the fail-fast lookup every pipeline builds on: a missing
//! element means the site layout changed, so it returns a [`LookupError`]
//! naming the query instead of an empty placeholder. [`find_all`] is the
//! non-failing counterpart for places where absence is normal.

use std::fmt;

use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html};

use crate::error::LookupError;
use crate::models::Page;

/// How a single attribute must match.
#[derive(Debug, Clone)]
pub enum AttrMatch {
    /// Equal value. For `class`, any one of the element's classes may match.
    Exact(String),
    /// Regular expression searched in the attribute value.
    Pattern(Regex),
}

/// Attribute constraints for a lookup. Empty means "any element of the tag".
#[derive(Debug, Clone, Default)]
pub struct Filter {
    attrs: Vec<(String, AttrMatch)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` to equal `value`.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs
            .push((name.into(), AttrMatch::Exact(value.into())));
        self
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Require `name` to match `pattern`.
    pub fn pattern(mut self, name: impl Into<String>, pattern: Regex) -> Self {
        self.attrs.push((name.into(), AttrMatch::Pattern(pattern)));
        self
    }

    fn matches(&self, element: &Element) -> bool {
        self.attrs.iter().all(|(name, rule)| {
            let Some(value) = element.attr(name) else {
                return false;
            };
            match rule {
                AttrMatch::Exact(expected) if name == "class" => {
                    value == expected || element.classes().any(|c| c == expected)
                }
                AttrMatch::Exact(expected) => value == expected,
                AttrMatch::Pattern(re) => re.is_match(value),
            }
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, rule)) in self.attrs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match rule {
                AttrMatch::Exact(value) => write!(f, "{name}={value:?}")?,
                AttrMatch::Pattern(re) => write!(f, "{name}=~/{}/", re.as_str())?,
            }
        }
        write!(f, "}}")
    }
}

/// Parsed page, read-only.
pub struct Document {
    html: Html,
    url: String,
}

impl Document {
    pub fn parse(page: &Page) -> Self {
        Self::from_html(&page.url, &page.text())
    }

    pub fn from_html(url: impl Into<String>, html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            url: url.into(),
        }
    }

    /// URL the document was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// First match anywhere in the document, including the root itself.
    pub fn require(&self, tag: &str, filter: &Filter) -> Result<ElementRef<'_>, LookupError> {
        let root = self.root();
        if is_match(root, tag, filter) {
            return Ok(root);
        }
        require(root, tag, filter)
    }

    pub fn find_all(&self, tag: &str, filter: &Filter) -> Vec<ElementRef<'_>> {
        let root = self.root();
        let mut found: Vec<_> = is_match(root, tag, filter).then_some(root).into_iter().collect();
        found.extend(find_all(root, tag, filter));
        found
    }
}

fn is_match(element: ElementRef<'_>, tag: &str, filter: &Filter) -> bool {
    element.value().name().eq_ignore_ascii_case(tag) && filter.matches(element.value())
}

/// Descendants of `node` in document order (depth first), `node` excluded.
fn matches<'a, 'q>(
    node: ElementRef<'a>,
    tag: &'q str,
    filter: &'q Filter,
) -> impl Iterator<Item = ElementRef<'a>> {
    node.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| is_match(*el, tag, filter))
}

/// First descendant of `node` matching `tag` and `filter`, or a lookup error.
pub fn require<'a>(
    node: ElementRef<'a>,
    tag: &str,
    filter: &Filter,
) -> Result<ElementRef<'a>, LookupError> {
    matches(node, tag, filter).next().ok_or_else(|| LookupError {
        tag: tag.to_string(),
        filter: filter.to_string(),
    })
}

/// Every descendant of `node` matching `tag` and `filter`.
pub fn find_all<'a>(node: ElementRef<'a>, tag: &str, filter: &Filter) -> Vec<ElementRef<'a>> {
    matches(node, tag, filter).collect()
}

/// Value of a required attribute.
pub fn require_attr<'a>(element: ElementRef<'a>, name: &str) -> Result<&'a str, LookupError> {
    element.value().attr(name).ok_or_else(|| LookupError {
        tag: element.value().name().to_string(),
        filter: format!("{{{name}}}"),
    })
}

/// Concatenated text of the element and its descendants.
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of the element following the one labelled `label`.
///
/// Finds the first text node equal to `label`, then reads the next sibling
/// element of that node's parent. Fits definition-style markup such as
/// `<dt>Status</dt><dd>Final</dd>`.
pub fn field_value(node: ElementRef<'_>, label: &str) -> Result<String, LookupError> {
    let not_found = || LookupError {
        tag: "text".to_string(),
        filter: format!("{label:?}"),
    };

    let label_node = node
        .descendants()
        .find(|n| {
            n.value().as_text().is_some_and(|t| {
                let s: &str = t;
                s == label
            })
        })
        .ok_or_else(not_found)?;

    label_node
        .parent()
        .and_then(|parent| parent.next_siblings().find_map(ElementRef::wrap))
        .map(text)
        .ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body>
          <section id="intro"><p class="lead note">Hello</p></section>
          <div class="toctree-wrapper">
            <ul>
              <li class="toctree-l1"><a href="3.12.html">3.12</a></li>
              <li class="toctree-l1"><a href="3.11.html">3.11</a></li>
              <li class="toctree-l2"><a href="x.html">nested</a></li>
            </ul>
          </div>
          <dl><dt>Status<span>:</span></dt>
              <dd><abbr>Final</abbr></dd></dl>
          <a href="python-docs-pdf-a4.zip">Download</a>
        </body></html>
    "#;

    fn doc() -> Document {
        Document::from_html("https://example.com/", HTML)
    }

    #[test]
    fn test_require_by_id_and_class() {
        let doc = doc();
        let section = doc.require("section", &Filter::new().id("intro")).unwrap();
        let lead = require(section, "p", &Filter::new().class("note")).unwrap();
        assert_eq!(text(lead), "Hello");
    }

    #[test]
    fn test_require_missing_tag_is_lookup_error() {
        let doc = doc();
        let err = doc
            .require("section", &Filter::new().id("numerical-index"))
            .unwrap_err();
        assert_eq!(err.tag, "section");
        assert_eq!(err.filter, "{id=\"numerical-index\"}");

        let err = doc.require("table", &Filter::new()).unwrap_err();
        assert_eq!(err.tag, "table");
        assert_eq!(err.filter, "{}");
    }

    #[test]
    fn test_require_searches_descendants_only() {
        let doc = doc();
        let lead = doc.require("p", &Filter::new()).unwrap();
        assert!(require(lead, "p", &Filter::new()).is_err());
    }

    #[test]
    fn test_find_all_in_document_order() {
        let doc = doc();
        let items = doc.find_all("li", &Filter::new().class("toctree-l1"));
        let texts: Vec<_> = items.into_iter().map(text).collect();
        assert_eq!(texts, ["3.12", "3.11"]);
        assert!(doc.find_all("table", &Filter::new()).is_empty());
    }

    #[test]
    fn test_pattern_filter() {
        let doc = doc();
        let re = Regex::new(r".+pdf-a4\.zip$").unwrap();
        let links = doc.find_all("a", &Filter::new().pattern("href", re));
        assert_eq!(links.len(), 1);
        assert_eq!(require_attr(links[0], "href").unwrap(), "python-docs-pdf-a4.zip");
    }

    #[test]
    fn test_require_attr_missing() {
        let doc = doc();
        let section = doc.require("section", &Filter::new()).unwrap();
        let err = require_attr(section, "href").unwrap_err();
        assert_eq!(err.tag, "section");
        assert_eq!(err.filter, "{href}");
    }

    #[test]
    fn test_field_value_reads_next_sibling() {
        let doc = doc();
        assert_eq!(field_value(doc.root(), "Status").unwrap(), "Final");
        let err = field_value(doc.root(), "Type").unwrap_err();
        assert_eq!(err.filter, "\"Type\"");
    }
}
