//! Error types for relab-ingest
//!
//! Two classes of failure:
//! - [`IngestError`]: load failures. The catalogs or lookup tables cannot be
//!   read, so the run aborts before any output is produced.
//! - [`RowSkip`]: row-local failures. The spectrum row is skipped, the reason
//!   is recorded in the diagnostics log, and the batch continues.

use std::path::Path;
use thiserror::Error;

/// Fatal error aborting the whole run
#[derive(Debug, Error)]
pub enum IngestError {
    /// Catalog sheet could not be read or parsed
    #[error("Failed to load {catalog} catalog: {source}")]
    Catalog {
        catalog: &'static str,
        #[source]
        source: relab_common::Error,
    },

    /// Catalog cell holds a value the loader cannot normalize
    #[error("{catalog} catalog row {row}, column {column}: {message}")]
    BadCell {
        catalog: &'static str,
        row: usize,
        column: usize,
        message: String,
    },

    /// Lookup tables missing, unparseable or inconsistent
    #[error("Invalid lookup tables: {0}")]
    LookupTables(String),

    /// Output directory could not be created
    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Diagnostics log could not be created or appended
    #[error("Diagnostics log error: {0}")]
    Diagnostics(#[from] std::io::Error),
}

/// Why a spectrum row produced no output file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSkip {
    #[error("Could not find sample data for {sample_id}: sample not found")]
    SampleNotFound { sample_id: String },

    /// Sample present but without a category; skipped without a log entry
    #[error("Sample {sample_id} is unclassified")]
    Unclassified { sample_id: String },

    #[error("Invalid spectrum row: {0}")]
    InvalidRow(String),

    #[error("Sample ID '{sample_id}' is not of the form <subgroup>-<PI initials>-<number>")]
    MalformedSampleId { sample_id: String },

    #[error("Could not find directory {path}: {reason}")]
    ResourceNotFound { path: String, reason: String },

    #[error("Error parsing data at {path}: {reason}")]
    ResourceMalformed { path: String, reason: String },

    #[error("Error writing CSV {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Skip reason without its payload, for tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipKind {
    SampleNotFound,
    Unclassified,
    InvalidRow,
    MalformedSampleId,
    ResourceNotFound,
    ResourceMalformed,
    WriteFailed,
}

impl SkipKind {
    pub fn label(self) -> &'static str {
        match self {
            SkipKind::SampleNotFound => "sample not found",
            SkipKind::Unclassified => "unclassified",
            SkipKind::InvalidRow => "invalid row",
            SkipKind::MalformedSampleId => "malformed sample id",
            SkipKind::ResourceNotFound => "resource not found",
            SkipKind::ResourceMalformed => "resource malformed",
            SkipKind::WriteFailed => "write failed",
        }
    }
}

impl RowSkip {
    pub fn kind(&self) -> SkipKind {
        match self {
            RowSkip::SampleNotFound { .. } => SkipKind::SampleNotFound,
            RowSkip::Unclassified { .. } => SkipKind::Unclassified,
            RowSkip::InvalidRow(_) => SkipKind::InvalidRow,
            RowSkip::MalformedSampleId { .. } => SkipKind::MalformedSampleId,
            RowSkip::ResourceNotFound { .. } => SkipKind::ResourceNotFound,
            RowSkip::ResourceMalformed { .. } => SkipKind::ResourceMalformed,
            RowSkip::WriteFailed { .. } => SkipKind::WriteFailed,
        }
    }

    /// Whether this skip gets a diagnostics log line
    ///
    /// Unclassified samples were already reported when the sample catalog
    /// was loaded.
    pub fn is_logged(&self) -> bool {
        !matches!(self, RowSkip::Unclassified { .. })
    }

    pub(crate) fn resource_not_found(path: &Path, reason: impl ToString) -> Self {
        RowSkip::ResourceNotFound {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn resource_malformed(path: &Path, reason: impl ToString) -> Self {
        RowSkip::ResourceMalformed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write_failed(path: &Path, reason: impl ToString) -> Self {
        RowSkip::WriteFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for load-phase operations
pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_not_found_reason() {
        let skip = RowSkip::SampleNotFound {
            sample_id: "XX-YY-001".to_string(),
        };
        assert!(skip.to_string().contains("sample not found"));
        assert!(skip.to_string().contains("XX-YY-001"));
        assert!(skip.is_logged());
        assert_eq!(skip.kind(), SkipKind::SampleNotFound);
    }

    #[test]
    fn test_unclassified_is_silent() {
        let skip = RowSkip::Unclassified {
            sample_id: "XX-YY-001".to_string(),
        };
        assert!(!skip.is_logged());
    }
}
