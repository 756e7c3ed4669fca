//! Sample catalog loader
//!
//! Classifies every sample row and keeps the classified ones keyed by
//! sample identifier. Unclassifiable rows are reported and left out, so a
//! missing key is the "not found" signal for the spectrum stage.

use crate::classifier::{SampleAttributes, SampleClassifier};
use crate::config::SampleColumns;
use crate::error::{IngestError, IngestResult};
use crate::types::Category;
use relab_common::{CellValue, TabularSource};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// Raw metadata of one sample catalog row
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMetadata {
    pub id: String,
    pub name: String,
    pub source: String,
    pub gen_type_1: String,
    pub gen_type_2: String,
    pub type_1: String,
    pub type_2: String,
    pub subtype: String,
    pub min_grain_size: CellValue,
    pub max_grain_size: CellValue,
    pub origin: String,
    pub chem_number: CellValue,
    pub description: String,
}

impl SampleMetadata {
    pub fn from_row(source: &dyn TabularSource, row: usize, cols: &SampleColumns) -> Self {
        let text = |col: usize| source.cell(row, col).as_text().into_owned();
        Self {
            id: text(cols.sample_id),
            name: text(cols.sample_name),
            source: text(cols.source),
            gen_type_1: text(cols.gen_type_1),
            gen_type_2: text(cols.gen_type_2),
            type_1: text(cols.type_1),
            type_2: text(cols.type_2),
            subtype: text(cols.subtype),
            min_grain_size: source.cell(row, cols.min_grain_size).clone(),
            max_grain_size: source.cell(row, cols.max_grain_size).clone(),
            origin: text(cols.origin),
            chem_number: source.cell(row, cols.chem_number).clone(),
            description: text(cols.text),
        }
    }

    pub fn attributes(&self) -> SampleAttributes<'_> {
        SampleAttributes {
            id: &self.id,
            source: &self.source,
            gen_type_1: &self.gen_type_1,
            gen_type_2: &self.gen_type_2,
            type_1: &self.type_1,
            type_2: &self.type_2,
            subtype: &self.subtype,
        }
    }
}

/// Classified sample, as the spectrum stage sees it
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub category: Option<Category>,
    /// Chemistry reference key: integer text, or empty when blank
    pub chem_key: String,
    /// Grain sizes in their text form (`"45.0"`, or empty when blank)
    pub min_grain_size: String,
    pub max_grain_size: String,
    pub location: String,
    pub name: String,
    /// Raw General Type 1 value
    pub material_class: String,
    pub subtype: String,
    pub origin: String,
    pub description: String,
}

/// Sample load statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleLoadStats {
    pub rows: usize,
    pub classified: usize,
    pub unclassified: usize,
    /// Rows whose identifier replaced an earlier row
    pub duplicates: usize,
    pub by_category: BTreeMap<String, usize>,
}

impl SampleLoadStats {
    pub fn display_string(&self) -> String {
        let mut s = format!(
            "{} samples read, {} classified, {} unclassified, {} duplicate IDs",
            self.rows, self.classified, self.unclassified, self.duplicates
        );
        if !self.by_category.is_empty() {
            let tally: Vec<String> = self
                .by_category
                .iter()
                .map(|(label, n)| format!("{} {}", n, label))
                .collect();
            s.push_str(&format!(" ({})", tally.join(", ")));
        }
        s
    }
}

/// Read-only map of classified samples
#[derive(Debug, Clone, Default)]
pub struct SampleCatalog {
    records: HashMap<String, SampleRecord>,
    stats: SampleLoadStats,
}

impl SampleCatalog {
    /// Classify and index every row after the header
    ///
    /// Duplicate identifiers: the last row wins and a warning is logged.
    /// A non-integer chemistry reference aborts the load.
    pub fn load(
        source: &dyn TabularSource,
        cols: &SampleColumns,
        classifier: &SampleClassifier,
        location: &str,
    ) -> IngestResult<Self> {
        let mut catalog = Self::default();

        for row in 1..source.row_count() {
            catalog.stats.rows += 1;
            let meta = SampleMetadata::from_row(source, row, cols);

            let Some(category) = classifier.classify(&meta.attributes()) else {
                catalog.stats.unclassified += 1;
                warn!("Skipping {}. Could not classify.", meta.attributes().triple());
                continue;
            };

            let chem_key = chem_key(&meta.chem_number).map_err(|message| IngestError::BadCell {
                catalog: "sample",
                row,
                column: cols.chem_number,
                message,
            })?;

            *catalog
                .stats
                .by_category
                .entry(category.label().to_string())
                .or_insert(0) += 1;
            catalog.stats.classified += 1;

            let record = SampleRecord {
                category: Some(category),
                chem_key,
                min_grain_size: meta.min_grain_size.as_text().into_owned(),
                max_grain_size: meta.max_grain_size.as_text().into_owned(),
                location: location.to_string(),
                name: meta.name,
                material_class: meta.gen_type_1,
                subtype: meta.subtype,
                origin: meta.origin,
                description: meta.description,
            };

            catalog.insert(meta.id, record);
        }

        info!("{}", catalog.stats.display_string());
        Ok(catalog)
    }

    /// Insert a record, replacing (and warning about) an existing one
    pub fn insert(&mut self, id: String, record: SampleRecord) {
        if self.records.contains_key(&id) {
            self.stats.duplicates += 1;
            warn!("Duplicate sample ID {}: later catalog row replaces earlier one", id);
        }
        self.records.insert(id, record);
    }

    pub fn get(&self, id: &str) -> Option<&SampleRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> &SampleLoadStats {
        &self.stats
    }
}

/// Normalize a chemistry reference cell to integer text (`""` when blank)
fn chem_key(cell: &CellValue) -> Result<String, String> {
    if cell.is_blank() {
        return Ok(String::new());
    }
    cell.to_integer()
        .map(|n| n.to_string())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::fixture_tables;
    use relab_common::Sheet;
    use std::sync::Arc;

    fn classifier() -> SampleClassifier {
        SampleClassifier::new(Arc::new(fixture_tables()))
    }

    fn sample_row(id: &str, name: &str, gen1: &str, type1: &str, chem: CellValue) -> Vec<CellValue> {
        let mut row = vec![CellValue::Empty; 20];
        row[0] = id.into();
        row[1] = name.into();
        row[6] = gen1.into();
        row[8] = type1.into();
        row[12] = CellValue::Number(45.0);
        row[13] = CellValue::Empty;
        row[16] = "Hawaii".into();
        row[18] = chem;
        row[19] = "Fresh surface".into();
        row
    }

    fn header() -> Vec<CellValue> {
        vec![CellValue::from("SampleID"); 20]
    }

    #[test]
    fn test_classified_rows_are_indexed() {
        let sheet = Sheet::new(vec![
            header(),
            sample_row("LS-CMP-001", "Quartz", "Mineral", "Quartz", CellValue::Number(12.0)),
        ]);
        let catalog =
            SampleCatalog::load(&sheet, &SampleColumns::default(), &classifier(), "RELAB").unwrap();

        let record = catalog.get("LS-CMP-001").unwrap();
        assert_eq!(record.category, Some(Category::Mineral));
        assert_eq!(record.chem_key, "12");
        assert_eq!(record.min_grain_size, "45.0");
        assert_eq!(record.max_grain_size, "");
        assert_eq!(record.location, "RELAB");
        assert_eq!(record.material_class, "Mineral");
        assert_eq!(record.origin, "Hawaii");
        assert_eq!(record.description, "Fresh surface");
    }

    #[test]
    fn test_unclassifiable_rows_are_excluded() {
        let sheet = Sheet::new(vec![
            header(),
            sample_row("LS-CMP-001", "Mystery", "Ice", "Water", CellValue::Empty),
            sample_row("LS-CMP-002", "Quartz", "Mineral", "Quartz", CellValue::Empty),
        ]);
        let catalog =
            SampleCatalog::load(&sheet, &SampleColumns::default(), &classifier(), "RELAB").unwrap();

        assert!(catalog.get("LS-CMP-001").is_none());
        assert_eq!(catalog.get("LS-CMP-002").unwrap().chem_key, "");
        assert_eq!(catalog.stats().unclassified, 1);
        assert_eq!(catalog.stats().classified, 1);
        assert_eq!(catalog.stats().by_category.get("Mineral"), Some(&1));
    }

    #[test]
    fn test_duplicate_ids_last_row_wins() {
        let sheet = Sheet::new(vec![
            header(),
            sample_row("LS-CMP-001", "First", "Mineral", "Quartz", CellValue::Empty),
            sample_row("LS-CMP-001", "Second", "Rock", "Basalt", CellValue::Empty),
        ]);
        let catalog =
            SampleCatalog::load(&sheet, &SampleColumns::default(), &classifier(), "RELAB").unwrap();

        assert_eq!(catalog.len(), 1);
        let record = catalog.get("LS-CMP-001").unwrap();
        assert_eq!(record.name, "Second");
        assert_eq!(record.category, Some(Category::Rock));
        assert_eq!(catalog.stats().duplicates, 1);
    }

    #[test]
    fn test_non_integer_chemistry_reference_aborts_load() {
        let sheet = Sheet::new(vec![
            header(),
            sample_row("LS-CMP-001", "Quartz", "Mineral", "Quartz", "n/a".into()),
        ]);
        let err = SampleCatalog::load(&sheet, &SampleColumns::default(), &classifier(), "RELAB")
            .unwrap_err();
        assert!(matches!(err, IngestError::BadCell { row: 1, column: 18, .. }));
    }

    #[test]
    fn test_load_summary_reports_category_tally() {
        let sheet = Sheet::new(vec![
            header(),
            sample_row("LS-CMP-001", "Quartz", "Mineral", "Quartz", CellValue::Empty),
            sample_row("LS-CMP-002", "Basalt", "Rock", "Basalt", CellValue::Empty),
            sample_row("LS-CMP-003", "Olivine", "Mineral", "Olivine", CellValue::Empty),
            sample_row("LS-CMP-004", "Mystery", "Ice", "Water", CellValue::Empty),
        ]);
        let catalog =
            SampleCatalog::load(&sheet, &SampleColumns::default(), &classifier(), "RELAB").unwrap();

        assert_eq!(
            catalog.stats().display_string(),
            "4 samples read, 3 classified, 1 unclassified, 0 duplicate IDs (2 Mineral, 1 Rock)"
        );
    }

    #[test]
    fn test_header_only_catalog_is_empty() {
        let sheet = Sheet::new(vec![header()]);
        let catalog =
            SampleCatalog::load(&sheet, &SampleColumns::default(), &classifier(), "RELAB").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.stats().rows, 0);
    }
}
