use std::fs::File;
use std::path::Path;

use crate::error::CorpusError;
use crate::index::tsv_reader_builder;

pub trait TranscriptNormalizer {
    fn normalize(&self, transcript: &str) -> String;
}

const SPACED: [(&str, &str); 6] = [
    (", ", " "),
    (",", " "),
    (" - ", " "),
    ("-", " "),
    (" – ", " "),
    ("–", " "),
];

const DROPPED: [char; 12] = ['.', '!', '?', ':', '"', '\'', '(', ')', '%', '„', '“', ';'];

/// Lowercases and strips punctuation the aligner's dictionary has no
/// entries for. Caller-supplied substitutions (abbreviations, acronyms)
/// run first, before lowercasing.
#[derive(Debug, Clone, Default)]
pub struct PunctuationNormalizer {
    substitutions: Vec<(String, String)>,
}

impl PunctuationNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_substitutions(substitutions: Vec<(String, String)>) -> Self {
        Self { substitutions }
    }

    /// Two-column TSV of `from \t to` pairs, applied in file order.
    pub fn from_substitutions_file(path: &Path) -> Result<Self, CorpusError> {
        let file =
            File::open(path).map_err(|err| CorpusError::io("opening substitutions", path, err))?;
        let mut rdr = tsv_reader_builder().quoting(false).from_reader(file);
        let mut substitutions = Vec::new();
        for (row_idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|err| CorpusError::csv("reading substitutions", err))?;
            match (record.get(0), record.get(1)) {
                (Some(from), Some(to)) if !from.is_empty() => {
                    substitutions.push((from.to_string(), to.to_string()));
                }
                (Some(""), None) | (None, _) => {}
                _ => {
                    return Err(CorpusError::invalid_input(format!(
                        "substitution line {} in '{}' needs two tab-separated columns",
                        row_idx + 1,
                        path.display()
                    )))
                }
            }
        }
        Ok(Self { substitutions })
    }
}

impl TranscriptNormalizer for PunctuationNormalizer {
    fn normalize(&self, transcript: &str) -> String {
        let mut text = transcript.to_string();
        for (from, to) in &self.substitutions {
            text = text.replace(from.as_str(), to);
        }
        for (from, to) in SPACED {
            text = text.replace(from, to);
        }
        text.retain(|ch| !DROPPED.contains(&ch));
        text.to_lowercase()
    }
}
