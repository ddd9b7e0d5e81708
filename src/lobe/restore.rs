use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::CorpusError;
use crate::index::{tsv_reader_builder, tsv_writer};
use crate::lobe::normalize::TranscriptNormalizer;
use crate::lobe::LobeDataset;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub written: usize,
    /// Recording ids whose normalized text matched no source transcript.
    pub unknown: Vec<String>,
}

/// Maps each normalized transcript in `dataset` back to its natural form.
/// When two transcripts normalize alike the first one wins.
pub fn natural_text_map(
    dataset: &LobeDataset,
    normalizer: &dyn TranscriptNormalizer,
) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(dataset.entries().len());
    for entry in dataset.entries() {
        let natural = match dataset.read_transcript(entry) {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                tracing::warn!(
                    text_file = entry.text_file.as_str(),
                    error = %err,
                    "unreadable transcript"
                );
                continue;
            }
        };
        let normalized = normalizer.normalize(&natural).trim().to_string();
        map.entry(normalized).or_insert(natural);
    }
    map
}

/// Rewrites a corpus index (recording id first, normalized text last) as
/// `recording id \t natural text \t normalized text`.
pub fn restore_natural_index(
    corpus_index: &Path,
    output: &Path,
    natural: &HashMap<String, String>,
) -> Result<RestoreSummary, CorpusError> {
    let file = File::open(corpus_index)
        .map_err(|err| CorpusError::io("opening corpus index", corpus_index, err))?;
    let mut rdr = tsv_reader_builder().quoting(false).from_reader(file);
    let mut writer = tsv_writer(output)?;

    let mut summary = RestoreSummary::default();
    for record in rdr.records() {
        let record = record.map_err(|err| CorpusError::csv("reading corpus index", err))?;
        let (Some(recording_id), Some(normalized)) = (record.get(0), record.iter().last()) else {
            continue;
        };
        if recording_id.trim().is_empty() {
            continue;
        }
        let normalized = normalized.trim();
        match natural.get(normalized) {
            Some(text) => {
                writer
                    .write_record([recording_id, text.as_str(), normalized])
                    .map_err(|err| CorpusError::csv("writing restored index", err))?;
                summary.written += 1;
            }
            None => {
                tracing::warn!(recording_id, normalized, "no natural transcript found");
                summary.unknown.push(recording_id.to_string());
            }
        }
    }
    writer
        .flush()
        .map_err(|err| CorpusError::io("flushing restored index", output, err))?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::lobe::normalize::PunctuationNormalizer;
    use crate::lobe::test_support::write_dataset;

    #[test]
    fn map_keys_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        let dataset = LobeDataset::load(dir.path()).unwrap();
        let map = natural_text_map(&dataset, &PunctuationNormalizer::new());
        assert_eq!(map.len(), 3);
        assert_eq!(map["halló heimur"], "Halló, heimur!");
        assert_eq!(map["síðasta setning"], "Síðasta setning?");
    }

    #[test]
    fn restores_natural_column() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("index.tsv");
        fs::write(
            &index,
            "rec_1\t/a/rec_1.flac\thalló heimur\n\
             rec_9\tkemur ekki fyrir\n\
             rec_3\tsíðasta setning\n",
        )
        .unwrap();
        let map = HashMap::from([
            ("halló heimur".to_string(), "Halló, heimur!".to_string()),
            ("síðasta setning".to_string(), "Síðasta setning?".to_string()),
        ]);
        let output = dir.path().join("index.nat.tsv");

        let summary = restore_natural_index(&index, &output, &map).unwrap();
        assert_eq!(summary.written, 2);
        assert_eq!(summary.unknown, vec!["rec_9".to_string()]);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "rec_1\tHalló, heimur!\thalló heimur\nrec_3\tSíðasta setning?\tsíðasta setning\n"
        );
    }

    #[test]
    fn missing_index_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = restore_natural_index(
            &dir.path().join("nope.tsv"),
            &dir.path().join("out.tsv"),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
