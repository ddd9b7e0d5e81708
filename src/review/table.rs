use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CorpusError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl ColumnRef {
    /// Header tables address columns by name, headerless ones by
    /// zero-based position.
    pub fn parse(raw: &str, has_header: bool) -> Result<Self, CorpusError> {
        if has_header {
            return Ok(Self::Name(raw.to_string()));
        }
        raw.trim().parse::<usize>().map(Self::Index).map_err(|_| {
            CorpusError::invalid_input(format!(
                "column '{raw}' must be a zero-based index when the table has no header"
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewColumns {
    pub audio: ColumnRef,
    pub text: ColumnRef,
    pub window: Option<(ColumnRef, ColumnRef)>,
}

impl ReviewColumns {
    pub fn new(
        audio: ColumnRef,
        text: ColumnRef,
        start: Option<ColumnRef>,
        end: Option<ColumnRef>,
    ) -> Result<Self, CorpusError> {
        let window = match (start, end) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(CorpusError::invalid_input(
                    "needs both start and end columns if either is present",
                ))
            }
        };
        Ok(Self {
            audio,
            text,
            window,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTable {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl ReviewTable {
    /// `.csv` files are comma separated, everything else tab separated.
    pub fn load(path: &Path, has_header: bool) -> Result<Self, CorpusError> {
        let delimiter = if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            b','
        } else {
            b'\t'
        };
        let file = File::open(path).map_err(|err| CorpusError::io("opening table", path, err))?;
        Self::from_reader(file, delimiter, has_header)
    }

    pub fn from_reader(
        reader: impl Read,
        delimiter: u8,
        has_header: bool,
    ) -> Result<Self, CorpusError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .delimiter(delimiter)
            .quote(b'"')
            .flexible(true)
            .from_reader(reader);

        let headers = if has_header {
            let headers = rdr
                .headers()
                .map_err(|err| CorpusError::csv("reading table header", err))?;
            Some(headers.iter().map(str::to_string).collect())
        } else {
            None
        };
        let rows = rdr
            .records()
            .map(|record| {
                record
                    .map(|record| record.iter().map(str::to_string).collect())
                    .map_err(|err| CorpusError::csv("reading table row", err))
            })
            .collect::<Result<Vec<Vec<String>>, _>>()?;
        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn resolve(&self, column: &ColumnRef) -> Result<usize, CorpusError> {
        match (column, &self.headers) {
            (ColumnRef::Index(index), _) => Ok(*index),
            (ColumnRef::Name(name), Some(headers)) => headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| CorpusError::invalid_input(format!("unknown column '{name}'"))),
            (ColumnRef::Name(name), None) => Err(CorpusError::invalid_input(format!(
                "column '{name}' referenced by name but the table has no header"
            ))),
        }
    }

    pub fn cell(&self, row: usize, column: &ColumnRef) -> Result<&str, CorpusError> {
        let column_idx = self.resolve(column)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column_idx))
            .map(String::as_str)
            .ok_or_else(|| {
                CorpusError::invalid_input(format!("row {} has no column {column_idx}", row + 1))
            })
    }
}
