//! LOBE recording-platform exports: `index.tsv` plus `audio/<speaker>/`
//! and `text/` folders.

mod normalize;
mod prepare;
mod restore;

pub use normalize::{PunctuationNormalizer, TranscriptNormalizer};
pub use prepare::{CorpusPreparer, PrepOptions, PrepSummary, PreparedRecording};
pub use restore::{natural_text_map, restore_natural_index, RestoreSummary};

use std::fs::{self, File};
use std::path::PathBuf;

use crate::error::CorpusError;
use crate::index::tsv_reader_builder;
use crate::types::LobeEntry;

#[derive(Debug, Clone)]
pub struct LobeDataset {
    root: PathBuf,
    entries: Vec<LobeEntry>,
}

impl LobeDataset {
    pub const INDEX_FILE: &'static str = "index.tsv";

    pub fn load(root: impl Into<PathBuf>) -> Result<Self, CorpusError> {
        let root = root.into();
        let index_path = root.join(Self::INDEX_FILE);
        let file = File::open(&index_path)
            .map_err(|err| CorpusError::io("opening LOBE index", &index_path, err))?;
        let mut rdr = tsv_reader_builder().quoting(false).from_reader(file);

        let mut entries = Vec::new();
        for (row_idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|err| CorpusError::csv("reading LOBE index", err))?;
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }
            let fields = record.iter().map(str::trim).collect::<Vec<_>>();
            let &[speaker, recording, text_file] = fields.as_slice() else {
                return Err(CorpusError::invalid_input(format!(
                    "line {} of '{}' has {} columns, expected speaker, recording and text file",
                    row_idx + 1,
                    index_path.display(),
                    fields.len()
                )));
            };
            entries.push(LobeEntry {
                speaker: speaker.to_string(),
                recording: recording.to_string(),
                text_file: text_file.to_string(),
            });
        }
        tracing::debug!(root = %root.display(), entries = entries.len(), "loaded LOBE index");
        Ok(Self { root, entries })
    }

    pub fn entries(&self) -> &[LobeEntry] {
        &self.entries
    }

    pub fn audio_path(&self, entry: &LobeEntry) -> PathBuf {
        self.root
            .join("audio")
            .join(&entry.speaker)
            .join(&entry.recording)
    }

    pub fn text_path(&self, entry: &LobeEntry) -> PathBuf {
        self.root.join("text").join(&entry.text_file)
    }

    pub fn read_transcript(&self, entry: &LobeEntry) -> Result<String, CorpusError> {
        let path = self.text_path(entry);
        fs::read_to_string(&path).map_err(|err| CorpusError::io("reading transcript", path, err))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_dataset_and_resolve_paths() {
        let dir = tempfile::tempdir().unwrap();
        test_support::write_dataset(dir.path());

        let dataset = LobeDataset::load(dir.path()).unwrap();
        assert_eq!(dataset.entries().len(), 3);
        let entry = &dataset.entries()[2];
        assert_eq!(entry.speaker, "spk_b");
        assert_eq!(entry.recording_id(), "rec_3");
        assert_eq!(
            dataset.audio_path(entry),
            dir.path().join("audio").join("spk_b").join("rec_3.webm")
        );
        assert_eq!(dataset.read_transcript(entry).unwrap(), "Síðasta setning?\n");
    }

    #[test]
    fn malformed_index_line_names_the_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("index.tsv"),
            "spk\trec.flac\trec.txt\nspk\tbroken.flac\n",
        )
        .unwrap();
        let err = LobeDataset::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
