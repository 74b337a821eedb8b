//! Fetched page data structure.

/// A fetched document. Created per fetch, parsed immediately, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final request URL
    pub url: String,

    /// Raw response body
    pub body: Vec<u8>,

    /// Configured text encoding. Only UTF-8 passes config validation, and
    /// `text` always decodes as UTF-8.
    pub encoding: String,
}

impl Page {
    pub fn new(url: impl Into<String>, body: Vec<u8>, encoding: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body,
            encoding: encoding.into(),
        }
    }

    /// Decode the body. Invalid UTF-8 sequences are replaced, never rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
