//! Batch ingest pipeline
//!
//! Phase 1 builds the sample and chemistry maps from their catalogs. Any
//! failure here aborts the run before output is produced.
//! Phase 2 streams spectra catalog rows through assembly, transcoding and
//! writing. Failures there skip the row and never abort the batch.

use crate::assembler::{SpectrumAssembler, SpectrumRow, ResourceLocator};
use crate::catalog::{ChemistryCatalog, SampleCatalog, SampleLoadStats};
use crate::classifier::SampleClassifier;
use crate::config::{IngestSettings, SpectraColumns};
use crate::diagnostics::DiagnosticsLog;
use crate::error::{IngestError, IngestResult, RowSkip, SkipKind};
use crate::lookup::LookupTables;
use crate::record::OutputRecord;
use crate::transcoder;
use crate::writer::{CsvFileWriter, RecordWriter};
use relab_common::{Sheet, TabularSource};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Spectrum stage statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Spectra catalog rows processed (header excluded)
    pub rows: usize,
    /// Output files written
    pub written: usize,
    pub skipped: BTreeMap<SkipKind, usize>,
}

impl BatchStats {
    fn record_skip(&mut self, skip: &RowSkip) {
        *self.skipped.entry(skip.kind()).or_insert(0) += 1;
    }

    pub fn skipped(&self, kind: SkipKind) -> usize {
        self.skipped.get(&kind).copied().unwrap_or(0)
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn display_string(&self) -> String {
        let mut s = format!(
            "{} spectra rows, {} written, {} skipped",
            self.rows,
            self.written,
            self.skipped_total()
        );
        if !self.skipped.is_empty() {
            let detail: Vec<String> = self
                .skipped
                .iter()
                .map(|(kind, n)| format!("{} {}", n, kind.label()))
                .collect();
            s.push_str(&format!(" ({})", detail.join(", ")));
        }
        s
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub samples: SampleLoadStats,
    pub batch: BatchStats,
    pub output_dir: PathBuf,
    pub error_log: PathBuf,
}

/// Both catalog maps, built once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub samples: SampleCatalog,
    pub chemistry: ChemistryCatalog,
}

/// Load the curated lookup tables; a run without them cannot classify
pub fn load_lookup_tables(path: Option<&Path>) -> IngestResult<LookupTables> {
    let path = path.ok_or_else(|| {
        IngestError::LookupTables(
            "no lookup tables configured (set `lookup_tables` or pass --lookup-tables)"
                .to_string(),
        )
    })?;
    LookupTables::load(path)
}

fn load_sheet(catalog: &'static str, path: &Path) -> IngestResult<Sheet> {
    debug!("Reading {} catalog from {}", catalog, path.display());
    Sheet::load(path).map_err(|source| IngestError::Catalog { catalog, source })
}

/// Build the sample and chemistry maps
pub fn load_catalogs(
    settings: &IngestSettings,
    classifier: &SampleClassifier,
) -> IngestResult<Catalogs> {
    let sample_sheet = load_sheet("sample", &settings.sample_catalogue)?;
    let samples = SampleCatalog::load(
        &sample_sheet,
        &settings.columns.samples,
        classifier,
        &settings.location_label,
    )?;

    let chem_sheet = load_sheet("chemistry", &settings.chem_analyses)?;
    let chemistry = ChemistryCatalog::load(&chem_sheet, &settings.columns.chemistry)?;

    Ok(Catalogs { samples, chemistry })
}

/// Stream every spectra row after the header through assembly and output
///
/// Only a failing diagnostics log aborts; every row failure is recorded and
/// skipped.
pub fn process_spectra<W, L>(
    spectra: &dyn TabularSource,
    cols: &SpectraColumns,
    assembler: &SpectrumAssembler<'_>,
    writer: &mut W,
    log: &mut DiagnosticsLog<L>,
) -> IngestResult<BatchStats>
where
    W: RecordWriter,
    L: Write,
{
    let mut stats = BatchStats::default();

    for row in 1..spectra.row_count() {
        stats.rows += 1;
        match process_row(spectra, row, cols, assembler, writer) {
            Ok(path) => {
                stats.written += 1;
                info!("Successfully wrote {}", path.display());
            }
            Err(skip) => {
                stats.record_skip(&skip);
                if !skip.is_logged() {
                    debug!("Row {}: {}", row, skip);
                    continue;
                }
                match skip.kind() {
                    SkipKind::ResourceMalformed | SkipKind::WriteFailed => {
                        error!("Row {}: {}", row, skip)
                    }
                    _ => warn!("Row {}: {}", row, skip),
                }
                log.record(row, &skip)?;
            }
        }
    }

    log.flush()?;
    Ok(stats)
}

fn process_row<W: RecordWriter>(
    spectra: &dyn TabularSource,
    row: usize,
    cols: &SpectraColumns,
    assembler: &SpectrumAssembler<'_>,
    writer: &mut W,
) -> Result<PathBuf, RowSkip> {
    let spectrum = SpectrumRow::from_row(spectra, row, cols)?;
    let assembled = assembler.assemble(&spectrum)?;
    let resource = &assembled.location.resource;

    let body = transcoder::transcode_file(resource).map_err(|e| {
        if e.is_unreadable() {
            RowSkip::resource_not_found(resource, e)
        } else {
            RowSkip::resource_malformed(resource, e)
        }
    })?;

    let record = OutputRecord::new(assembled.header, body);
    let name = &assembled.location.output_name;
    let destination = writer.destination(name);
    writer
        .write_record(name, &record)
        .map_err(|e| RowSkip::write_failed(&destination, e))?;

    Ok(destination)
}

/// Run the whole batch
pub fn run(settings: &IngestSettings) -> IngestResult<RunSummary> {
    let tables = load_lookup_tables(settings.lookup_tables.as_deref())?;
    let classifier = SampleClassifier::new(Arc::new(tables));

    let catalogs = load_catalogs(settings, &classifier)?;
    let spectra = load_sheet("spectra", &settings.spectra_catalogue)?;

    let mut log = DiagnosticsLog::create(&settings.error_log)?;
    let mut writer = CsvFileWriter::create(&settings.output_dir).map_err(|source| {
        IngestError::OutputDir {
            path: settings.output_dir.clone(),
            source,
        }
    })?;

    let locator = ResourceLocator::new(&settings.data_dir);
    let assembler = SpectrumAssembler::new(&catalogs.samples, &catalogs.chemistry, &locator);

    let batch = process_spectra(
        &spectra,
        &settings.columns.spectra,
        &assembler,
        &mut writer,
        &mut log,
    )?;

    info!("{}", batch.display_string());

    Ok(RunSummary {
        samples: catalogs.samples.stats().clone(),
        batch,
        output_dir: settings.output_dir.clone(),
        error_log: settings.error_log.clone(),
    })
}
