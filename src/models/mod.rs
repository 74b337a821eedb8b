// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod page;
mod soft_failures;
mod status;
mod table;

// Re-export all public types
pub use config::{Config, HttpConfig, LoggingConfig, PathsConfig, SitesConfig};
pub use page::Page;
pub use soft_failures::SoftFailureLog;
pub use status::{AcceptedStatuses, StatusExpectations};
pub use table::{ResultTable, Row};
