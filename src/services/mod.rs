//! Service layer for the crawler application.
//!
//! This module contains the shared building blocks of every pipeline:
//! - Cached page fetching (`PageFetcher`)
//! - Document tree queries (`Document`, `require`, `find_all`)

mod fetcher;
pub mod navigator;

pub use fetcher::PageFetcher;
pub use navigator::{Document, Filter};
