use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CorpusError;
use crate::index::tsv_writer;
use crate::lobe::normalize::TranscriptNormalizer;
use crate::lobe::LobeDataset;
use crate::pipeline::runtime::FailedRecording;
use crate::pipeline::traits::AudioConverter;
use crate::types::LobeEntry;

#[derive(Debug, Clone, Default)]
pub struct PrepOptions {
    /// Only the first `max_entries` index rows are used.
    pub max_entries: Option<usize>,
    /// Where to write the per-recording provenance TSV.
    pub index_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRecording {
    pub recording_id: String,
    pub source_audio: PathBuf,
    pub corpus_audio: PathBuf,
    pub source_text: PathBuf,
    pub corpus_text: PathBuf,
    pub natural_text: String,
    pub normalized_text: String,
}

impl PreparedRecording {
    fn index_row(&self) -> [String; 7] {
        [
            self.recording_id.clone(),
            self.source_audio.display().to_string(),
            self.corpus_audio.display().to_string(),
            self.source_text.display().to_string(),
            self.corpus_text.display().to_string(),
            self.natural_text.clone(),
            self.normalized_text.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrepSummary {
    pub prepared: Vec<PreparedRecording>,
    pub failed: Vec<FailedRecording>,
}

/// Lays out a LOBE dataset as a flat aligner corpus: `<id>.wav` next to a
/// normalized `<id>.lab` transcript.
pub struct CorpusPreparer<'a> {
    dataset: &'a LobeDataset,
    converter: &'a dyn AudioConverter,
    normalizer: &'a dyn TranscriptNormalizer,
}

impl<'a> CorpusPreparer<'a> {
    pub fn new(
        dataset: &'a LobeDataset,
        converter: &'a dyn AudioConverter,
        normalizer: &'a dyn TranscriptNormalizer,
    ) -> Self {
        Self {
            dataset,
            converter,
            normalizer,
        }
    }

    pub fn selected_entries(&self, max_entries: Option<usize>) -> &'a [LobeEntry] {
        let entries = self.dataset.entries();
        match max_entries {
            Some(max) if max < entries.len() => &entries[..max],
            Some(max) => {
                if max > entries.len() {
                    tracing::warn!(
                        requested = max,
                        available = entries.len(),
                        "subset is larger than the dataset, using the full corpus"
                    );
                }
                entries
            }
            None => entries,
        }
    }

    /// Fails without writing anything when `corpus_dir` already exists.
    /// Individual recordings that fail are logged and reported in the
    /// summary.
    pub fn prepare<F>(
        &self,
        corpus_dir: &Path,
        options: &PrepOptions,
        mut on_done: F,
    ) -> Result<PrepSummary, CorpusError>
    where
        F: FnMut(&LobeEntry, Result<&PreparedRecording, &CorpusError>),
    {
        fs::create_dir(corpus_dir).map_err(|err| {
            if err.kind() == io::ErrorKind::AlreadyExists {
                CorpusError::invalid_input(format!(
                    "corpus folder '{}' already exists",
                    corpus_dir.display()
                ))
            } else {
                CorpusError::io("creating corpus folder", corpus_dir, err)
            }
        })?;

        let mut index_writer = options.index_path.as_deref().map(tsv_writer).transpose()?;
        let mut summary = PrepSummary::default();
        for entry in self.selected_entries(options.max_entries) {
            match self.prepare_entry(entry, corpus_dir) {
                Ok(prepared) => {
                    if let Some(writer) = index_writer.as_mut() {
                        writer
                            .write_record(prepared.index_row())
                            .map_err(|err| CorpusError::csv("writing corpus index", err))?;
                    }
                    on_done(entry, Ok(&prepared));
                    summary.prepared.push(prepared);
                }
                Err(err) => {
                    tracing::warn!(
                        recording = entry.recording.as_str(),
                        error = %err,
                        "skipping recording"
                    );
                    on_done(entry, Err(&err));
                    summary.failed.push(FailedRecording {
                        recording_id: entry.recording_id().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        if let (Some(writer), Some(path)) = (index_writer.as_mut(), options.index_path.as_ref()) {
            writer
                .flush()
                .map_err(|err| CorpusError::io("flushing corpus index", path, err))?;
        }
        Ok(summary)
    }

    pub fn prepare_entry(
        &self,
        entry: &LobeEntry,
        corpus_dir: &Path,
    ) -> Result<PreparedRecording, CorpusError> {
        let recording_id = entry.recording_id().to_string();
        let source_audio = self.dataset.audio_path(entry);
        let corpus_audio = corpus_dir.join(format!("{recording_id}.wav"));
        tracing::debug!(
            source = %source_audio.display(),
            target = %corpus_audio.display(),
            "converting audio"
        );
        self.converter.convert(&source_audio, &corpus_audio)?;

        let source_text = self.dataset.text_path(entry);
        let corpus_text = corpus_dir.join(format!("{recording_id}.lab"));
        let natural = self.dataset.read_transcript(entry)?;
        let normalized = self.normalizer.normalize(&natural);
        fs::write(&corpus_text, format!("{normalized}\n"))
            .map_err(|err| CorpusError::io("writing transcript", &corpus_text, err))?;

        Ok(PreparedRecording {
            recording_id,
            source_audio,
            corpus_audio,
            source_text,
            corpus_text,
            natural_text: natural.trim().to_string(),
            normalized_text: normalized.trim().to_string(),
        })
    }
}
