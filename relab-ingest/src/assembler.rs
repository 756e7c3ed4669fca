//! Spectrum record assembler
//!
//! Joins one spectra catalog row with its sample and chemistry data and
//! derives the composite header fields (grain size, viewing geometry,
//! combined info/reference text). The numeric body is produced separately
//! by the transcoder from the located raw file.

use crate::catalog::{ChemistryCatalog, SampleCatalog, SampleRecord};
use crate::config::SpectraColumns;
use crate::error::RowSkip;
use crate::record::{HeaderBuilder, HeaderField};
use crate::types::Category;
use relab_common::table::format_float;
use relab_common::time::serial_to_iso_date_1904;
use relab_common::{CellValue, TabularSource};
use std::path::PathBuf;
use tracing::warn;

/// Sentinel for an unmeasured angle
pub const ANGLE_NOT_AVAILABLE: &str = "NA";

/// Name keywords marking a sample measured as a whole object
pub const WHOLE_OBJECT_KEYWORDS: [&str; 5] = ["chip", "slab", "rock", "cube", "polished"];

pub const WHOLE_OBJECT: &str = "Whole Object";
pub const UNKNOWN: &str = "Unknown";

/// One spectra catalog row
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRow {
    pub spectrum_id: String,
    pub sample_id: String,
    pub min_wavelength: i64,
    pub max_wavelength: i64,
    pub resolution: CellValue,
    pub date_added: CellValue,
    pub source_angle: CellValue,
    pub detect_angle: CellValue,
    pub reference: String,
}

impl SpectrumRow {
    /// Read a row; non-integer wavelength bounds make the row invalid
    pub fn from_row(
        source: &dyn TabularSource,
        row: usize,
        cols: &SpectraColumns,
    ) -> Result<Self, RowSkip> {
        let text = |col: usize| source.cell(row, col).as_text().into_owned();
        let integer = |col: usize, what: &str| {
            source
                .cell(row, col)
                .to_integer()
                .map_err(|e| RowSkip::InvalidRow(format!("{}: {}", what, e)))
        };

        Ok(Self {
            spectrum_id: text(cols.spectrum_id),
            sample_id: text(cols.sample_id),
            min_wavelength: integer(cols.min_wavelength, "minimum wavelength")?,
            max_wavelength: integer(cols.max_wavelength, "maximum wavelength")?,
            resolution: source.cell(row, cols.resolution).clone(),
            date_added: source.cell(row, cols.date_added).clone(),
            source_angle: source.cell(row, cols.source_angle).clone(),
            detect_angle: source.cell(row, cols.detect_angle).clone(),
            reference: text(cols.reference),
        })
    }
}

/// Where a spectrum's raw data lives and where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumLocation {
    /// `<data_dir>/<pi>/<subgroup>/<spectrum>.txt`
    pub resource: PathBuf,
    /// `<subgroup>_<pi>_<spectrum>.csv`
    pub output_name: String,
}

/// Maps sample/spectrum identifiers onto raw data files
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    data_dir: PathBuf,
}

impl ResourceLocator {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Sample IDs are `<subgroup>-<PI initials>-<number>`; all parts lowercased
    pub fn locate(&self, sample_id: &str, spectrum_id: &str) -> Result<SpectrumLocation, RowSkip> {
        let mut parts = sample_id.split('-');
        let (Some(subgroup), Some(pi_initials)) = (parts.next(), parts.next()) else {
            return Err(RowSkip::MalformedSampleId {
                sample_id: sample_id.to_string(),
            });
        };
        let subgroup = subgroup.to_lowercase();
        let pi_initials = pi_initials.to_lowercase();
        let spectrum = spectrum_id.to_lowercase();

        Ok(SpectrumLocation {
            resource: self
                .data_dir
                .join(&pi_initials)
                .join(&subgroup)
                .join(format!("{}.txt", spectrum)),
            output_name: format!("{}_{}_{}.csv", subgroup, pi_initials, spectrum),
        })
    }
}

/// Header plus located raw data, ready for transcoding
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSpectrum {
    pub header: Vec<HeaderField>,
    pub location: SpectrumLocation,
}

/// Joins spectrum rows against the read-only catalogs
#[derive(Debug, Clone, Copy)]
pub struct SpectrumAssembler<'a> {
    samples: &'a SampleCatalog,
    chemistry: &'a ChemistryCatalog,
    locator: &'a ResourceLocator,
}

impl<'a> SpectrumAssembler<'a> {
    pub fn new(
        samples: &'a SampleCatalog,
        chemistry: &'a ChemistryCatalog,
        locator: &'a ResourceLocator,
    ) -> Self {
        Self {
            samples,
            chemistry,
            locator,
        }
    }

    pub fn assemble(&self, row: &SpectrumRow) -> Result<AssembledSpectrum, RowSkip> {
        let sample = self
            .samples
            .get(&row.sample_id)
            .ok_or_else(|| RowSkip::SampleNotFound {
                sample_id: row.sample_id.clone(),
            })?;

        let Some(category) = sample.category.as_ref() else {
            return Err(RowSkip::Unclassified {
                sample_id: row.sample_id.clone(),
            });
        };

        let (other_info, references) = self.chemistry_text(sample);
        let other_info = join_nonempty(other_info, &sample.subtype);
        let references = join_nonempty(references, &row.reference);

        let grain_size = grain_size(category, sample, &other_info);
        let date_added = date_added(&row.date_added)?;

        let sample_name = if sample.name.is_empty() {
            other_info.to_lowercase()
        } else {
            sample.name.clone()
        };

        let grain_size_description = if sample.max_grain_size.is_empty() {
            String::new()
        } else {
            format!("<{}um", sample.max_grain_size)
        };

        let mut header = HeaderBuilder::new();
        header
            .add("Date Added to VISOR", date_added)
            .add("Grain Size Description", grain_size_description)
            .add("Grain Size", grain_size)
            .add("Locality", sample.origin.as_str())
            .add_int("Minimum Wavelength", row.min_wavelength)
            .add("Sample Name", sample_name)
            .add_int("Maximum Wavelength", row.max_wavelength)
            .add("Database of Origin", sample.location.as_str())
            .add("Other Information", other_info)
            .add("References", references)
            .add("Resolution", resolution(&row.resolution))
            .add("Material class", category.label())
            .add("Sample Description", sample.description.as_str())
            .add("Spectrum ID", row.spectrum_id.as_str())
            .add("Original Sample ID", row.sample_id.as_str())
            .add("Viewing Geometry", view_geometry(&row.source_angle, &row.detect_angle));

        let location = self.locator.locate(&row.sample_id, &row.spectrum_id)?;

        Ok(AssembledSpectrum {
            header: header.finish(),
            location,
        })
    }

    /// Other info and references for a sample's chemistry reference
    ///
    /// Keys `""` and `"0"` mean no analysis. A key with no catalog entry is
    /// treated as no analysis as well, with a warning.
    fn chemistry_text(&self, sample: &SampleRecord) -> (&'a str, &'a str) {
        if sample.chem_key.is_empty() || sample.chem_key == "0" {
            return ("", "");
        }
        match self.chemistry.get(&sample.chem_key) {
            Some(record) => (record.other_info.as_str(), record.references.as_str()),
            None => {
                warn!(
                    "Chemistry reference {} not found in chemistry catalog, treating as empty",
                    sample.chem_key
                );
                ("", "")
            }
        }
    }
}

/// `"A, B"`, or whichever side is non-empty
pub fn join_nonempty(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (false, false) => format!("{}, {}", first, second),
        (false, true) => first.to_string(),
        (true, _) => second.to_string(),
    }
}

/// `i<source> e<detector>` in whole degrees, or "Unknown"
pub fn view_geometry(source_angle: &CellValue, detect_angle: &CellValue) -> String {
    match (angle_degrees(source_angle), angle_degrees(detect_angle)) {
        (Some(i), Some(e)) => format!("i{} e{}", i, e),
        _ => UNKNOWN.to_string(),
    }
}

fn angle_degrees(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        CellValue::Text(s) if s.as_str() != ANGLE_NOT_AVAILABLE => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| n.trunc() as i64),
        _ => None,
    }
}

/// Grain size label for a sample
///
/// Reference samples are always whole objects. Otherwise numeric bounds are
/// rendered as a value or range; when bounds are missing or both zero the
/// sample name (then description, then the combined other-info text) is
/// scanned for whole-object keywords.
pub fn grain_size(category: &Category, sample: &SampleRecord, other_info: &str) -> String {
    if *category == Category::Reference {
        return WHOLE_OBJECT.to_string();
    }

    let name_is_whole_object = has_whole_object_keyword(&sample.name);

    let (Some(min), Some(max)) = (
        parse_grain_bound(&sample.min_grain_size),
        parse_grain_bound(&sample.max_grain_size),
    ) else {
        return if name_is_whole_object { WHOLE_OBJECT } else { UNKNOWN }.to_string();
    };

    if name_is_whole_object {
        return WHOLE_OBJECT.to_string();
    }

    if min == 0.0 && max == 0.0 {
        let whole = has_whole_object_keyword(&sample.description)
            || has_whole_object_keyword(other_info);
        return if whole { WHOLE_OBJECT } else { UNKNOWN }.to_string();
    }

    if min > 0.0 && (max == 0.0 || sample.max_grain_size.is_empty()) {
        return format_float(min);
    }

    if max > 0.0 && sample.min_grain_size.is_empty() {
        return format_float(max);
    }

    format!("{} - {}", format_float(min), format_float(max))
}

fn parse_grain_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn has_whole_object_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    WHOLE_OBJECT_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn resolution(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(n) if *n == 0.0 => String::new(),
        other => other.as_text().into_owned(),
    }
}

/// ISO date for a 1904-system serial; text passes through, blank omits
fn date_added(cell: &CellValue) -> Result<String, RowSkip> {
    match cell {
        CellValue::Number(serial) => serial_to_iso_date_1904(*serial)
            .ok_or_else(|| RowSkip::InvalidRow(format!("invalid date serial {}", serial))),
        other => Ok(other.as_text().into_owned()),
    }
}
