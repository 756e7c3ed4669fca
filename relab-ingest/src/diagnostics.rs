//! Append-only diagnostics log
//!
//! One line per skipped or failed spectrum row: the reason and the
//! originating spectra catalog row.

use crate::error::RowSkip;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Diagnostics sink over any writer
pub struct DiagnosticsLog<W: Write> {
    out: W,
}

impl DiagnosticsLog<BufWriter<File>> {
    /// Create (truncate) the log file
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> DiagnosticsLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Record a skipped row
    pub fn record(&mut self, row: usize, skip: &RowSkip) -> io::Result<()> {
        writeln!(self.out, "{} (row {})", skip, row)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
