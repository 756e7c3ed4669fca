//! Chemistry catalog loader
//!
//! Pure reshape: reference number → (other info, references), both trimmed.

use crate::config::ChemistryColumns;
use crate::error::{IngestError, IngestResult};
use relab_common::TabularSource;
use std::collections::HashMap;
use tracing::info;

/// Supplementary text for one chemistry analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChemistryRecord {
    pub other_info: String,
    pub references: String,
}

/// Read-only map keyed by normalized reference number
#[derive(Debug, Clone, Default)]
pub struct ChemistryCatalog {
    records: HashMap<String, ChemistryRecord>,
}

impl ChemistryCatalog {
    /// Index every row after the header
    ///
    /// Every row must carry an integer reference number; anything else
    /// aborts the load.
    pub fn load(source: &dyn TabularSource, cols: &ChemistryColumns) -> IngestResult<Self> {
        let mut records = HashMap::new();

        for row in 1..source.row_count() {
            let key = source
                .cell(row, cols.ref_number)
                .to_integer()
                .map_err(|e| IngestError::BadCell {
                    catalog: "chemistry",
                    row,
                    column: cols.ref_number,
                    message: e.to_string(),
                })?
                .to_string();

            let record = ChemistryRecord {
                other_info: source.cell(row, cols.other_info).as_text().trim().to_string(),
                references: source.cell(row, cols.references).as_text().trim().to_string(),
            };
            records.insert(key, record);
        }

        info!("{} chemistry analyses loaded", records.len());
        Ok(Self { records })
    }

    pub fn get(&self, key: &str) -> Option<&ChemistryRecord> {
        self.records.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, record: ChemistryRecord) {
        self.records.insert(key.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relab_common::{CellValue, Sheet};

    fn chem_row(num: CellValue, refs: &str, other: &str) -> Vec<CellValue> {
        let mut row = vec![CellValue::Empty; 23];
        row[0] = num;
        row[21] = refs.into();
        row[22] = other.into();
        row
    }

    #[test]
    fn test_rows_are_keyed_by_integer_reference() {
        let sheet = Sheet::new(vec![
            vec![CellValue::from("RefNum")],
            chem_row(CellValue::Number(12.0), "  Smith 2001 ", " XRF major elements\n"),
        ]);
        let catalog = ChemistryCatalog::load(&sheet, &ChemistryColumns::default()).unwrap();

        let record = catalog.get("12").unwrap();
        assert_eq!(record.references, "Smith 2001");
        assert_eq!(record.other_info, "XRF major elements");
        assert!(catalog.get("12.0").is_none());
    }

    #[test]
    fn test_blank_reference_number_aborts_load() {
        let sheet = Sheet::new(vec![
            vec![CellValue::from("RefNum")],
            chem_row(CellValue::Empty, "", ""),
        ]);
        let err = ChemistryCatalog::load(&sheet, &ChemistryColumns::default()).unwrap_err();
        assert!(matches!(err, IngestError::BadCell { catalog: "chemistry", row: 1, .. }));
    }
}
