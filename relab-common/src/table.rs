//! Tabular source abstraction
//!
//! Catalogs arrive as sheets of typed cells. Spreadsheet parsing itself is out
//! of scope; sheets are read from a JSON or tab-separated export of the
//! workbook's first sheet.
//!
//! Cell text rendering follows the catalog tool's historical output: numeric
//! cells are floats, so `45` renders as `45.0` and `0.00001` as `1e-05`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One typed spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric cell (spreadsheets store every number as a float)
    Number(f64),
    /// Text cell
    Text(String),
    /// Blank cell
    Empty,
}

impl CellValue {
    /// True for blank cells and empty text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text form of the cell
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(format_float(*n)),
            CellValue::Empty => Cow::Borrowed(""),
        }
    }

    /// Numeric value, if the cell holds one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer normalization used for reference-number keys
    ///
    /// Numbers truncate toward zero (`12.0` → `12`); text must be an integer
    /// literal. Blank cells are an error; callers decide what blank means.
    pub fn to_integer(&self) -> Result<i64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Ok(n.trunc() as i64),
            CellValue::Number(n) => Err(Error::InvalidInput(format!(
                "non-finite number {} where an integer was expected",
                n
            ))),
            CellValue::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                Error::InvalidInput(format!("'{}' is not an integer", s))
            }),
            CellValue::Empty => Err(Error::InvalidInput(
                "blank cell where an integer was expected".to_string(),
            )),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Read access to a sheet of cells
///
/// Row 0 is the header row. Reading outside the populated area yields a blank
/// cell, matching how ragged spreadsheet rows behave.
pub trait TabularSource {
    /// Number of rows including the header row
    fn row_count(&self) -> usize;

    /// Cell at (row, col)
    fn cell(&self, row: usize, col: usize) -> &CellValue;
}

/// In-memory sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Load a sheet export, choosing the format from the file extension
    ///
    /// `.json` → array of row arrays; `.tsv`/`.txt` → tab-separated text.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let sheet = match ext.as_str() {
            "json" => Self::from_json_str(&content),
            "tsv" | "txt" => Ok(Self::from_tsv_str(&content)),
            other => Err(Error::Config(format!(
                "unsupported sheet format '.{}' (expected .json or .tsv)",
                other
            ))),
        };

        sheet.map_err(|e| match e {
            Error::InvalidInput(message) => Error::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse a JSON export: `[[cell, ...], ...]` with null/number/string cells
    pub fn from_json_str(content: &str) -> Result<Self> {
        let rows: Vec<Vec<CellValue>> = serde_json::from_str(content)
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(Self { rows })
    }

    /// Parse a tab-separated export
    ///
    /// Empty fields become blank cells; numeric literals become numbers.
    ///
    /// TSV carries no cell types, so the typing is per field, not per column:
    /// an all-digit identifier such as `12345` reads as a number and renders
    /// as `12345.0` in text position. Catalogs with numeric-looking text
    /// identifiers should be exported as JSON, which keeps strings as text.
    pub fn from_tsv_str(content: &str) -> Self {
        let rows = content
            .lines()
            .map(|line| line.split('\t').map(parse_tsv_cell).collect())
            .collect();
        Self { rows }
    }
}

impl TabularSource for Sheet {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

fn parse_tsv_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    let looks_numeric = field
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if looks_numeric {
        if let Ok(n) = field.trim().parse::<f64>() {
            return CellValue::Number(n);
        }
    }
    CellValue::Text(field.to_string())
}

/// Render a float the way the catalog tool always has
///
/// Shortest round-trip digits; integral values keep a trailing `.0`;
/// magnitudes below 1e-4 or from 1e16 up switch to exponent form with a
/// signed, at-least-two-digit exponent (`1e-05`, `1.5e+16`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{:e}", value);
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let mut s = format!("{}", value);
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_matches_historical_rendering() {
        assert_eq!(format_float(45.0), "45.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.42), "0.42");
        assert_eq!(format_float(1500.0), "1500.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(1.5e16), "1.5e+16");
        assert_eq!(format_float(1e16), "1e+16");
    }

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text(String::new()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_to_integer_truncates_numbers() {
        assert_eq!(CellValue::Number(12.0).to_integer().unwrap(), 12);
        assert_eq!(CellValue::Number(12.9).to_integer().unwrap(), 12);
        assert_eq!(CellValue::from(" 7 ").to_integer().unwrap(), 7);
        assert!(CellValue::from("7.5").to_integer().is_err());
        assert!(CellValue::Empty.to_integer().is_err());
    }

    #[test]
    fn test_json_sheet_cells() {
        let sheet = Sheet::from_json_str(r#"[["ID", "Value"], ["A-B-1", 3.5, null]]"#).unwrap();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(1, 0), &CellValue::from("A-B-1"));
        assert_eq!(sheet.cell(1, 1), &CellValue::Number(3.5));
        assert_eq!(sheet.cell(1, 2), &CellValue::Empty);
        // Beyond the ragged row end
        assert_eq!(sheet.cell(1, 40), &CellValue::Empty);
        assert_eq!(sheet.cell(9, 0), &CellValue::Empty);
    }

    #[test]
    fn test_tsv_sheet_cell_typing() {
        let sheet = Sheet::from_tsv_str("ID\tAngle\tNote\nX-Y-1\t30\tNA\nX-Y-2\t\t1e-3\n");
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.cell(1, 1), &CellValue::Number(30.0));
        assert_eq!(sheet.cell(1, 2), &CellValue::from("NA"));
        assert_eq!(sheet.cell(2, 1), &CellValue::Empty);
        assert_eq!(sheet.cell(2, 2), &CellValue::Number(0.001));
    }

    #[test]
    fn test_numeric_identifier_typing_differs_between_tsv_and_json() {
        let tsv = Sheet::from_tsv_str("ID\n12345\n");
        assert_eq!(tsv.cell(1, 0), &CellValue::Number(12345.0));
        assert_eq!(tsv.cell(1, 0).as_text(), "12345.0");

        let json = Sheet::from_json_str(r#"[["ID"], ["12345"]]"#).unwrap();
        assert_eq!(json.cell(1, 0), &CellValue::from("12345"));
        assert_eq!(json.cell(1, 0).as_text(), "12345");
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(Sheet::from_json_str("{\"not\": \"rows\"}").is_err());
    }
}
