//! Output record: ordered header rows followed by numeric data rows

use crate::transcoder::DataPoint;
use relab_common::table::format_float;

/// Label of the row separating header from data
pub const MARKER_LABEL: &str = "Wavelength";
/// Value of the row separating header from data
pub const MARKER_VALUE: &str = "Response";

/// One header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub label: &'static str,
    pub value: String,
}

/// Header builder that drops empty values
///
/// Fields without a value are omitted entirely so the viewer applies its own
/// default, rather than written as blanks.
#[derive(Debug, Default)]
pub struct HeaderBuilder {
    fields: Vec<HeaderField>,
}

impl HeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.is_empty() {
            self.fields.push(HeaderField { label, value });
        }
        self
    }

    /// Integer field; zero counts as absent
    pub fn add_int(&mut self, label: &'static str, value: i64) -> &mut Self {
        if value != 0 {
            self.fields.push(HeaderField {
                label,
                value: value.to_string(),
            });
        }
        self
    }

    /// Finish with the data marker row
    pub fn finish(mut self) -> Vec<HeaderField> {
        self.fields.push(HeaderField {
            label: MARKER_LABEL,
            value: MARKER_VALUE.to_string(),
        });
        self.fields
    }
}

/// A complete output file
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub header: Vec<HeaderField>,
    pub body: Vec<DataPoint>,
}

impl OutputRecord {
    pub fn new(header: Vec<HeaderField>, body: Vec<DataPoint>) -> Self {
        Self { header, body }
    }

    /// All rows in file order, as text cells
    pub fn rows(&self) -> impl Iterator<Item = [String; 2]> + '_ {
        let header = self
            .header
            .iter()
            .map(|f| [f.label.to_string(), f.value.clone()]);
        let body = self
            .body
            .iter()
            .map(|p| [format_float(p.wavelength_nm), format_float(p.response)]);
        header.chain(body)
    }
}
