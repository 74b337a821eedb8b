// src/lib.rs

//! pydoc-crawler library: Python documentation and PEP index scraping.

pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
