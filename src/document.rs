//! Corpus tables.
//!
//! Corpora are stored as delimited text with a header row. `.tsv` files use a
//! tab delimiter, everything else a comma.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TITLE_COLUMN: &str = "Title";
pub const ABSTRACT_COLUMN: &str = "Abstract";
pub const DOI_COLUMN: &str = "DOI";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

pub type TableResult<T> = Result<T, TableError>;

/// One article of a corpus.
/// Only `title` and `abstract_text` are used for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// DOI when present, otherwise the row position in the source table
    pub key: Box<str>,
    /// 0-based row position in the source table
    pub row: usize,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
}

impl Document {
    pub fn new(row: usize, title: Option<&str>, abstract_text: Option<&str>) -> Self {
        Self {
            key: row.to_string().into_boxed_str(),
            row,
            title: title.map(str::to_string),
            abstract_text: abstract_text.map(str::to_string),
        }
    }

    pub fn with_key(mut self, key: impl Into<Box<str>>) -> Self {
        self.key = key.into();
        self
    }

    /// Both text fields are missing or blank
    pub fn is_blank(&self) -> bool {
        let blank = |f: &Option<String>| f.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.title) && blank(&self.abstract_text)
    }
}

/// Delimiter for a table path
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Header + records of a delimited table, columns kept as-is
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
}

impl Table {
    pub fn read(path: &Path) -> TableResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, delimiter_for(path))
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> TableResult<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    pub fn write(&self, path: &Path) -> TableResult<()> {
        let file = File::create(path)?;
        self.to_writer(file, delimiter_for(path))
    }

    pub fn to_writer<W: Write>(&self, writer: W, delimiter: u8) -> TableResult<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(writer);
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    #[inline]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &'static str) -> TableResult<usize> {
        self.column(name).ok_or(TableError::MissingColumn(name))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Documents in row order.
    /// Empty cells are treated as missing.
    pub fn documents(&self) -> TableResult<Vec<Document>> {
        let title = self.require_column(TITLE_COLUMN)?;
        let abstract_col = self.require_column(ABSTRACT_COLUMN)?;
        let doi = self.column(DOI_COLUMN);

        let cell = |record: &StringRecord, idx: usize| -> Option<String> {
            record
                .get(idx)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(self
            .records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let key = doi
                    .and_then(|idx| record.get(idx))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map_or_else(|| row.to_string(), str::to_string);
                Document {
                    key: key.into_boxed_str(),
                    row,
                    title: cell(record, title),
                    abstract_text: cell(record, abstract_col),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "Title\tAbstract\tDOI\tJournal\n\
        Deep Nets\tWe train nets.\t10.1/a\tNature\n\
        \t\t\tEmpty\n\
        Graphs\t\t\tScience\n";

    #[test]
    fn reads_documents_with_keys() {
        let table = Table::from_reader(RAW.as_bytes(), b'\t').unwrap();
        let docs = table.documents().unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(&*docs[0].key, "10.1/a");
        assert_eq!(docs[0].title.as_deref(), Some("Deep Nets"));
        assert!(docs[1].is_blank());
        assert_eq!(&*docs[2].key, "2");
        assert_eq!(docs[2].abstract_text, None);
        assert!(!docs[2].is_blank());
    }

    #[test]
    fn missing_column_is_reported() {
        let table = Table::from_reader("Title,Summary\na,b\n".as_bytes(), b',').unwrap();
        assert!(matches!(
            table.documents(),
            Err(TableError::MissingColumn(ABSTRACT_COLUMN))
        ));
    }

    #[test]
    fn delimiter_follows_extension() {
        assert_eq!(delimiter_for(Path::new("raw/arxiv.tsv")), b'\t');
        assert_eq!(delimiter_for(Path::new("arxiv.TSV")), b'\t');
        assert_eq!(delimiter_for(Path::new("arxiv.csv")), b',');
        assert_eq!(delimiter_for(Path::new("arxiv")), b',');
    }

    #[test]
    fn file_round_trip_keeps_columns() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::from_reader(RAW.as_bytes(), b'\t').unwrap();
        let path = dir.path().join("copy.csv");
        table.write(&path).unwrap();
        let back = Table::read(&path).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.column("Journal"), Some(3));
    }
}
