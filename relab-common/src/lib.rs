//! # RELAB Common Library
//!
//! Shared code for the RELAB catalog tooling:
//! - Error types
//! - TOML configuration loading and path resolution
//! - Tabular source abstraction (typed sheet cells) and file-backed loaders
//! - Spreadsheet date conversion

pub mod config;
pub mod error;
pub mod table;
pub mod time;

pub use error::{Error, Result};
pub use table::{CellValue, Sheet, TabularSource};
