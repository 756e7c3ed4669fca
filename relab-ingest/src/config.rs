//! Configuration for relab-ingest
//!
//! Read from `ingest.toml` (every field optional). Relative catalog and data
//! paths resolve against the catalog root; output and log paths resolve
//! against the working directory.
//!
//! Column positions are a contract with the catalog exports. The defaults
//! are the historical positions of the RELAB workbooks.

use relab_common::config::LoggingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RELAB_CONFIG";
/// Environment variable naming the catalog root
pub const ROOT_ENV_VAR: &str = "RELAB_ROOT";
/// Config file name under the platform config dir
pub const CONFIG_FILE_NAME: &str = "ingest.toml";

/// TOML form of the ingest configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// Root of the catalog release (catalogues/ and data/ live below it)
    pub catalog_root: Option<PathBuf>,
    pub sample_catalogue: PathBuf,
    pub spectra_catalogue: PathBuf,
    pub chem_analyses: PathBuf,
    /// Raw spectrum files: `<data_dir>/<pi>/<subgroup>/<spectrum>.txt`
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub error_log: PathBuf,
    /// "Database of Origin" header value
    pub location_label: String,
    /// Curated classifier sets (required)
    pub lookup_tables: Option<PathBuf>,
    pub columns: ColumnLayout,
    pub logging: LoggingConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            catalog_root: None,
            sample_catalogue: PathBuf::from("catalogues/Sample_Catalogue.json"),
            spectra_catalogue: PathBuf::from("catalogues/Spectra_Catalogue.json"),
            chem_analyses: PathBuf::from("catalogues/Chem_Analyses.json"),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            error_log: PathBuf::from("ingest_error_log.txt"),
            location_label: "RELAB".to_string(),
            lookup_tables: None,
            columns: ColumnLayout::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Column positions for all three catalogs
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnLayout {
    pub samples: SampleColumns,
    pub spectra: SpectraColumns,
    pub chemistry: ChemistryColumns,
}

/// Sample catalog column positions
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SampleColumns {
    pub sample_id: usize,
    pub sample_name: usize,
    pub source: usize,
    pub gen_type_1: usize,
    pub gen_type_2: usize,
    pub type_1: usize,
    pub type_2: usize,
    pub subtype: usize,
    pub min_grain_size: usize,
    pub max_grain_size: usize,
    pub origin: usize,
    pub chem_number: usize,
    pub text: usize,
}

impl Default for SampleColumns {
    fn default() -> Self {
        Self {
            sample_id: 0,
            sample_name: 1,
            source: 5,
            gen_type_1: 6,
            gen_type_2: 7,
            type_1: 8,
            type_2: 9,
            subtype: 10,
            min_grain_size: 12,
            max_grain_size: 13,
            origin: 16,
            chem_number: 18,
            text: 19,
        }
    }
}

/// Spectra catalog column positions
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpectraColumns {
    pub spectrum_id: usize,
    pub sample_id: usize,
    pub date_added: usize,
    pub min_wavelength: usize,
    pub max_wavelength: usize,
    pub resolution: usize,
    pub source_angle: usize,
    pub detect_angle: usize,
    pub reference: usize,
}

impl Default for SpectraColumns {
    fn default() -> Self {
        Self {
            spectrum_id: 0,
            sample_id: 1,
            date_added: 2,
            min_wavelength: 5,
            max_wavelength: 6,
            resolution: 7,
            source_angle: 8,
            detect_angle: 9,
            reference: 22,
        }
    }
}

/// Chemistry catalog column positions
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChemistryColumns {
    pub ref_number: usize,
    pub references: usize,
    pub other_info: usize,
}

impl Default for ChemistryColumns {
    fn default() -> Self {
        Self {
            ref_number: 0,
            references: 21,
            other_info: 22,
        }
    }
}

/// Fully resolved paths and settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct IngestSettings {
    pub sample_catalogue: PathBuf,
    pub spectra_catalogue: PathBuf,
    pub chem_analyses: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub error_log: PathBuf,
    pub location_label: String,
    pub lookup_tables: Option<PathBuf>,
    pub columns: ColumnLayout,
}

impl IngestConfig {
    /// Resolve relative paths against `catalog_root`
    pub fn resolve(self, catalog_root: &Path) -> IngestSettings {
        let under_root = |p: PathBuf| {
            if p.is_absolute() {
                p
            } else {
                catalog_root.join(p)
            }
        };

        IngestSettings {
            sample_catalogue: under_root(self.sample_catalogue),
            spectra_catalogue: under_root(self.spectra_catalogue),
            chem_analyses: under_root(self.chem_analyses),
            data_dir: under_root(self.data_dir),
            output_dir: self.output_dir,
            error_log: self.error_log,
            location_label: self.location_label,
            lookup_tables: self.lookup_tables,
            columns: self.columns,
        }
    }
}
