//! Output record writers
//!
//! Records are written as two-column CSV with minimal quoting and CRLF row
//! terminators, so reruns over identical inputs produce identical bytes.

use crate::record::OutputRecord;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Destination for finished output records
pub trait RecordWriter {
    /// Where a record named `name` will be written
    fn destination(&self, name: &str) -> PathBuf;

    /// Persist one record
    fn write_record(&mut self, name: &str, record: &OutputRecord) -> io::Result<()>;
}

/// Writes each record to `<output_dir>/<name>`
#[derive(Debug, Clone)]
pub struct CsvFileWriter {
    output_dir: PathBuf,
}

impl CsvFileWriter {
    /// Create the writer, creating the output directory if missing
    pub fn create(output_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }
}

impl RecordWriter for CsvFileWriter {
    fn destination(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    fn write_record(&mut self, name: &str, record: &OutputRecord) -> io::Result<()> {
        let mut file = io::BufWriter::new(fs::File::create(self.destination(name))?);
        write_csv(&mut file, record)?;
        file.flush()
    }
}

/// Serialize a record as CSV
pub fn write_csv<W: Write>(out: &mut W, record: &OutputRecord) -> io::Result<()> {
    for row in record.rows() {
        let line = row
            .iter()
            .map(|cell| quote_cell(cell))
            .collect::<Vec<_>>()
            .join(",");
        out.write_all(line.as_bytes())?;
        out.write_all(b"\r\n")?;
    }
    Ok(())
}

fn quote_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::HeaderBuilder;
    use crate::transcoder::DataPoint;

    fn to_csv_string(record: &OutputRecord) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, record).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn record() -> OutputRecord {
        let mut header = HeaderBuilder::new();
        header
            .add("Other Information", "XRF, Tholeiite")
            .add("Sample Description", "6\" slab")
            .add("Spectrum ID", "C1LS01");
        OutputRecord::new(
            header.finish(),
            vec![
                DataPoint { wavelength_nm: 300.0, response: 0.1 },
                DataPoint { wavelength_nm: 1500.0, response: 0.42 },
            ],
        )
    }

    #[test]
    fn test_csv_quoting_and_terminators() {
        let csv = to_csv_string(&record());
        assert_eq!(
            csv,
            "Other Information,\"XRF, Tholeiite\"\r\n\
             Sample Description,\"6\"\" slab\"\r\n\
             Spectrum ID,C1LS01\r\n\
             Wavelength,Response\r\n\
             300.0,0.1\r\n\
             1500.0,0.42\r\n"
        );
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("output");
        let mut writer = CsvFileWriter::create(&output_dir).unwrap();
        assert!(output_dir.is_dir());

        writer.write_record("ls_cmp_c1ls01.csv", &record()).unwrap();
        let written = std::fs::read_to_string(output_dir.join("ls_cmp_c1ls01.csv")).unwrap();
        assert_eq!(written, to_csv_string(&record()));
    }
}
