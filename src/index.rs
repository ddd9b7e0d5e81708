use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::CorpusError;
use crate::types::RecordingEntry;

/// Read a tab-separated recording index: id in column 0, audio path in
/// column 1, any further columns ignored.
///
/// Rows without an audio path are skipped with a warning so that one bad
/// line does not abort a batch.
pub fn read_recording_index(path: &Path) -> Result<Vec<RecordingEntry>, CorpusError> {
    let file = File::open(path).map_err(|err| CorpusError::io("opening index", path, err))?;
    parse_recording_index(io::BufReader::new(file))
}

pub fn parse_recording_index(reader: impl Read) -> Result<Vec<RecordingEntry>, CorpusError> {
    let mut rdr = tsv_reader_builder().from_reader(reader);

    let mut entries = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record.map_err(|err| CorpusError::csv("reading recording index", err))?;
        let id = record.get(0).map(str::trim).unwrap_or_default();
        let audio = record.get(1).map(str::trim).unwrap_or_default();
        if id.is_empty() && record.len() <= 1 {
            continue;
        }
        if id.is_empty() || audio.is_empty() {
            tracing::warn!(
                line = row_idx + 1,
                columns = record.len(),
                "skipping index row without recording id and audio path"
            );
            continue;
        }
        entries.push(RecordingEntry {
            recording_id: id.to_string(),
            audio_path: PathBuf::from(audio),
        });
    }
    Ok(entries)
}

pub(crate) fn tsv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true);
    builder
}

pub(crate) fn tsv_writer(path: &Path) -> Result<csv::Writer<File>, CorpusError> {
    let file = File::create(path).map_err(|err| CorpusError::io("creating TSV file", path, err))?;
    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(file))
}
