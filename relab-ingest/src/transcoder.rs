//! Raw spectrum transcoder
//!
//! Raw files are tab-separated `wavelength<TAB>response` rows after two
//! non-data lines. Wavelengths are microns and are scaled to nanometers with
//! exact decimal arithmetic before becoming floats; responses are reflectance
//! fractions and pass through unscaled.
//!
//! Any malformed row fails the whole file. Partial spectra are never emitted.

use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Micron → nanometer scale factor
pub const MICRON_TO_NM: i64 = 1000;

/// Lines before the first data row
const PREAMBLE_LINES: usize = 2;

/// One output data row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub wavelength_nm: f64,
    pub response: f64,
}

/// Transcoding failure
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected wavelength and response columns")]
    MissingColumn { line: usize },

    #[error("line {line}: '{value}' is not a number")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: wavelength {value} out of range after scaling")]
    Overflow { line: usize, value: String },
}

impl TranscodeError {
    /// The file itself could not be read (as opposed to bad content)
    pub fn is_unreadable(&self) -> bool {
        matches!(self, TranscodeError::Io(_))
    }
}

/// Read and transcode a raw spectrum file
pub fn transcode_file(path: &Path) -> Result<Vec<DataPoint>, TranscodeError> {
    let content = std::fs::read_to_string(path)?;
    transcode_str(&content)
}

/// Transcode raw spectrum text
pub fn transcode_str(content: &str) -> Result<Vec<DataPoint>, TranscodeError> {
    let scale = Decimal::from(MICRON_TO_NM);

    content
        .lines()
        .enumerate()
        .skip(PREAMBLE_LINES)
        .map(|(idx, raw)| {
            let line = idx + 1;
            let mut fields = raw.split('\t');
            let (Some(wavelength), Some(response)) = (fields.next(), fields.next()) else {
                return Err(TranscodeError::MissingColumn { line });
            };

            let microns = parse_decimal(wavelength, line)?;
            let nanometers = microns
                .checked_mul(scale)
                .ok_or_else(|| TranscodeError::Overflow {
                    line,
                    value: wavelength.trim().to_string(),
                })?;

            Ok(DataPoint {
                wavelength_nm: decimal_to_f64(nanometers, line)?,
                response: decimal_to_f64(parse_decimal(response, line)?, line)?,
            })
        })
        .collect()
}

fn parse_decimal(field: &str, line: usize) -> Result<Decimal, TranscodeError> {
    let text = field.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| TranscodeError::InvalidNumber {
            line,
            value: text.to_string(),
        })
}

/// Correctly rounded conversion via the decimal text form
fn decimal_to_f64(value: Decimal, line: usize) -> Result<f64, TranscodeError> {
    let text = value.to_string();
    text.parse::<f64>()
        .map_err(|_| TranscodeError::InvalidNumber { line, value: text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relab_common::table::format_float;

    const PREAMBLE: &str = "Wavelength(micron)\tReflectance\n2 columns\n";

    #[test]
    fn test_micron_to_nanometer_conversion() {
        let points = transcode_str(&format!("{}1.5\t0.42\n", PREAMBLE)).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(format_float(points[0].wavelength_nm), "1500.0");
        assert_eq!(format_float(points[0].response), "0.42");
    }

    #[test]
    fn test_scaling_has_no_float_drift() {
        // 0.3 * 1000 in binary floating point is 300.00000000000006
        let points = transcode_str(&format!("{}0.3\t0.1\n0.35\t0.2\n", PREAMBLE)).unwrap();
        assert_eq!(format_float(points[0].wavelength_nm), "300.0");
        assert_eq!(format_float(points[1].wavelength_nm), "350.0");
    }

    #[test]
    fn test_preamble_is_discarded_unconditionally() {
        let content = "0.3\t0.1\n0.4\t0.2\n0.5\t0.3\n";
        let points = transcode_str(content).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].wavelength_nm, 500.0);
    }

    #[test]
    fn test_crlf_and_padding() {
        let content = "h1\r\nh2\r\n 0.5 \t 0.25\r\n";
        let points = transcode_str(content).unwrap();
        assert_eq!(points[0], DataPoint { wavelength_nm: 500.0, response: 0.25 });
    }

    #[test]
    fn test_scientific_notation() {
        let points = transcode_str(&format!("{}2.5e-1\t4.2e-1\n", PREAMBLE)).unwrap();
        assert_eq!(points[0].wavelength_nm, 250.0);
        assert_eq!(points[0].response, 0.42);
    }

    #[test]
    fn test_non_numeric_field_fails_whole_file() {
        let content = format!("{}0.3\t0.1\n0.4\tn/a\n0.5\t0.3\n", PREAMBLE);
        let err = transcode_str(&content).unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidNumber { line: 4, .. }));
        assert!(!err.is_unreadable());
    }

    #[test]
    fn test_missing_column_fails_whole_file() {
        let content = format!("{}0.3\t0.1\n0.4\n", PREAMBLE);
        let err = transcode_str(&content).unwrap_err();
        assert!(matches!(err, TranscodeError::MissingColumn { line: 4 }));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let points = transcode_str(&format!("{}0.3\t0.1\t0.002\n", PREAMBLE)).unwrap();
        assert_eq!(points[0].response, 0.1);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = transcode_file(Path::new("/nonexistent/relab/c1ls01.txt")).unwrap_err();
        assert!(err.is_unreadable());
    }
}
