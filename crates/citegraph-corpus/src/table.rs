//! Tab-delimited corpus tables.
//!
//! Columns are located by header name, so extra columns are ignored and
//! order does not matter. Every [`Field`] column must be present except
//! `Database`, which per-source exports usually lack.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::record::{Field, Record};

/// Error reading or writing a corpus table.
#[derive(Debug)]
pub enum TableError {
    Io { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    MissingColumn { column: &'static str },
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Csv(e) => write!(f, "CSV: {e}"),
            Self::MissingColumn { column } => write!(f, "missing column {column:?}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(e) => Some(e),
            Self::MissingColumn { .. } => None,
        }
    }
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// Read a corpus table from disk.
pub fn read_records(path: &Path) -> Result<Vec<Record>, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records_from(file)?;
    log::debug!("{}: {} records", path.display(), records.len());
    Ok(records)
}

/// Read a corpus table from any reader.
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<Record>, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut columns: Vec<(Field, usize)> = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        match headers.iter().position(|h| Field::from_header(h) == Some(field)) {
            Some(idx) => columns.push((field, idx)),
            None if field == Field::Database => {}
            None => return Err(TableError::MissingColumn { column: field.header() }),
        }
    }

    let mut records = Vec::new();
    for (row_num, row) in rdr.records().enumerate() {
        let row = row?;
        if row.len() < headers.len() {
            log::debug!(
                "row {}: {} of {} fields, rest treated as missing",
                row_num + 2,
                row.len(),
                headers.len()
            );
        }
        let mut record = Record::default();
        for &(field, idx) in &columns {
            if let Some(value) = row.get(idx) {
                record.set(field, value);
            }
        }
        records.push(record);
    }
    Ok(records)
}

/// Write records as a tab-delimited table with the canonical header.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), TableError> {
    let file = File::create(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_records_to(file, records)?;
    log::debug!("{}: wrote {} records", path.display(), records.len());
    Ok(())
}

pub fn write_records_to<W: Write>(writer: W, records: &[Record]) -> Result<(), TableError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    wtr.write_record(Field::ALL.map(Field::header))?;
    for record in records {
        wtr.write_record(Field::ALL.map(|f| record.get(f).unwrap_or("")))?;
    }
    wtr.flush().map_err(|e| TableError::Csv(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Title\tAuthors\tDate\tDOI\tKeywords\tAbstract\tJournal\tPubMed ID\tDatabase\n\
        Paper A\tAda Lovelace\t2020\t10.1/A\t\tAbs\tJ1\t123\tPubmed\n\
        Paper B\t\t2021\t\tkw\t\t\t\tEBSCO\n";

    #[test]
    fn reads_by_header() {
        let records = read_records_from(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(Field::Doi), Some("10.1/A"));
        assert_eq!(records[0].get(Field::SecondaryId), Some("123"));
        assert!(records[0].is_missing(Field::Keywords));
        assert!(records[1].is_missing(Field::Doi));
        assert_eq!(records[1].get(Field::Database), Some("EBSCO"));
    }

    #[test]
    fn column_order_does_not_matter() {
        let tsv = "DOI\tTitle\tAuthors\tDate\tKeywords\tAbstract\tJournal\tPubMed_ID\n10.9/q\tQ\t\t\t\t\t\t77\n";
        let records = read_records_from(tsv.as_bytes()).unwrap();
        assert_eq!(records[0].get(Field::Title), Some("Q"));
        assert_eq!(records[0].get(Field::SecondaryId), Some("77"));
        assert!(records[0].is_missing(Field::Database));
    }

    #[test]
    fn missing_required_column() {
        let err = read_records_from("Title\tDOI\nA\t10.1/a\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { column: "Authors" }));
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let tsv = "Title\tAuthors\tDate\tDOI\tKeywords\tAbstract\tJournal\tPubMed ID\tDatabase\nOnly title\n";
        let records = read_records_from(tsv.as_bytes()).unwrap();
        assert_eq!(records[0].get(Field::Title), Some("Only title"));
        assert!(records[0].is_missing(Field::Doi));
    }

    #[test]
    fn write_then_read_back() {
        let records = read_records_from(SAMPLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_records_to(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Title\tAuthors\tDate\tDOI"));
        assert_eq!(read_records_from(text.as_bytes()).unwrap(), records);
    }

    #[test]
    fn tabs_inside_values_are_quoted() {
        let record = Record::default()
            .with(Field::Title, "Tab\tinside")
            .with(Field::Doi, "10.1/t");
        let mut buf = Vec::new();
        write_records_to(&mut buf, std::slice::from_ref(&record)).unwrap();
        let back = read_records_from(buf.as_slice()).unwrap();
        assert_eq!(back, vec![record]);
    }
}
