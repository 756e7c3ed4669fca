//! Catalog loaders
//!
//! Both loaders run once, before any spectrum row is processed, and produce
//! read-only maps shared by the spectrum stage.

pub mod chemistry;
pub mod samples;

pub use chemistry::{ChemistryCatalog, ChemistryRecord};
pub use samples::{SampleCatalog, SampleLoadStats, SampleMetadata, SampleRecord};
