//! # relab-ingest
//!
//! Batch ingest of the RELAB reflectance spectra library.
//!
//! Builds a sample map (classified into material categories) and a chemistry
//! map from their catalogs, then joins every spectra catalog row against them
//! and writes one self-describing CSV per spectrum: a metadata header followed
//! by the transcoded wavelength/response pairs. Rows that cannot be joined,
//! located, parsed or written are recorded in a diagnostics log and skipped.

pub mod assembler;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lookup;
pub mod pipeline;
pub mod record;
pub mod transcoder;
pub mod types;
pub mod writer;

pub use classifier::{SampleAttributes, SampleClassifier};
pub use config::{IngestConfig, IngestSettings};
pub use error::{IngestError, IngestResult, RowSkip, SkipKind};
pub use lookup::LookupTables;
pub use pipeline::{run, BatchStats, RunSummary};
pub use types::Category;
