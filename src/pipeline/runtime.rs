use std::path::PathBuf;

use serde::Serialize;

use crate::config::TrimPolicy;
use crate::error::CorpusError;
use crate::pipeline::traits::{AlignmentSource, AudioTrimmer};
use crate::trim::plan_cuts;
use crate::types::{CutPlan, RecordingEntry};

pub struct TrimBatch {
    policy: TrimPolicy,
    output_dir: PathBuf,
    alignment_source: Box<dyn AlignmentSource>,
    trimmer: Box<dyn AudioTrimmer>,
}

pub(crate) struct TrimBatchParts {
    pub policy: TrimPolicy,
    pub output_dir: PathBuf,
    pub alignment_source: Box<dyn AlignmentSource>,
    pub trimmer: Box<dyn AudioTrimmer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimmedRecording {
    pub recording_id: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub original_duration: f64,
    pub kept_duration: f64,
    pub plan: CutPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRecording {
    pub recording_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub trimmed: Vec<TrimmedRecording>,
    pub failed: Vec<FailedRecording>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.trimmed.len() + self.failed.len()
    }
}

impl TrimBatch {
    pub(crate) fn from_parts(parts: TrimBatchParts) -> Self {
        Self {
            policy: parts.policy,
            output_dir: parts.output_dir,
            alignment_source: parts.alignment_source,
            trimmer: parts.trimmer,
        }
    }

    pub fn policy(&self) -> &TrimPolicy {
        &self.policy
    }

    pub fn output_path(&self, recording_id: &str) -> PathBuf {
        self.output_dir.join(format!("{recording_id}.wav"))
    }

    /// Plan and trim one recording.
    pub fn process(&self, entry: &RecordingEntry) -> Result<TrimmedRecording, CorpusError> {
        let tier = self.alignment_source.load_tier(&entry.recording_id)?;
        let plan = plan_cuts(&tier, &self.policy)?;
        let output = self.output_path(&entry.recording_id);
        self.trimmer.trim(&entry.audio_path, &output, &plan)?;
        Ok(TrimmedRecording {
            recording_id: entry.recording_id.clone(),
            source: entry.audio_path.clone(),
            output,
            original_duration: tier.duration(),
            kept_duration: plan.kept_duration(),
            plan,
        })
    }

    /// Process every entry in order. A failing recording is logged and
    /// recorded in the summary; the remaining entries still run.
    pub fn run<F>(&self, entries: &[RecordingEntry], mut on_done: F) -> BatchSummary
    where
        F: FnMut(&RecordingEntry, Result<&TrimmedRecording, &CorpusError>),
    {
        let mut summary = BatchSummary::default();
        for entry in entries {
            match self.process(entry) {
                Ok(trimmed) => {
                    tracing::debug!(
                        recording_id = entry.recording_id.as_str(),
                        boundaries = ?trimmed.plan.boundaries,
                        "trimmed recording"
                    );
                    on_done(entry, Ok(&trimmed));
                    summary.trimmed.push(trimmed);
                }
                Err(err) => {
                    tracing::warn!(
                        recording_id = entry.recording_id.as_str(),
                        error = %err,
                        "skipping recording"
                    );
                    on_done(entry, Err(&err));
                    summary.failed.push(FailedRecording {
                        recording_id: entry.recording_id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::types::{AlignmentTier, Interval};

    struct InMemorySource {
        tiers: HashMap<String, AlignmentTier>,
    }

    impl AlignmentSource for InMemorySource {
        fn load_tier(&self, recording_id: &str) -> Result<AlignmentTier, CorpusError> {
            self.tiers
                .get(recording_id)
                .cloned()
                .ok_or_else(|| CorpusError::MissingArtifact {
                    recording_id: recording_id.to_string(),
                    path: PathBuf::from(format!("{recording_id}.TextGrid")),
                })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingTrimmer {
        calls: Arc<Mutex<Vec<(PathBuf, PathBuf, Vec<f64>)>>>,
    }

    impl AudioTrimmer for RecordingTrimmer {
        fn trim(&self, source: &Path, output: &Path, plan: &CutPlan) -> Result<(), CorpusError> {
            self.calls.lock().unwrap().push((
                source.to_path_buf(),
                output.to_path_buf(),
                plan.boundaries.clone(),
            ));
            Ok(())
        }
    }

    fn entry(id: &str) -> RecordingEntry {
        RecordingEntry {
            recording_id: id.to_string(),
            audio_path: PathBuf::from(format!("audio/{id}.flac")),
        }
    }

    fn batch(trimmer: RecordingTrimmer) -> TrimBatch {
        let mut tiers = HashMap::new();
        tiers.insert(
            "good".to_string(),
            AlignmentTier::new(
                "words",
                vec![
                    Interval::silence(0.0, 1.0),
                    Interval::new(1.0, 3.0, "orð"),
                    Interval::silence(3.0, 4.5),
                    Interval::new(4.5, 6.0, "fleiri"),
                    Interval::silence(6.0, 7.0),
                ],
            ),
        );
        tiers.insert(
            "speech_first".to_string(),
            AlignmentTier::new(
                "words",
                vec![Interval::new(0.0, 1.0, "strax"), Interval::silence(1.0, 2.0)],
            ),
        );
        TrimBatch::from_parts(TrimBatchParts {
            policy: TrimPolicy {
                max_padding: 0.3,
                max_pause: 0.5,
            },
            output_dir: PathBuf::from("trimmed"),
            alignment_source: Box::new(InMemorySource { tiers }),
            trimmer: Box::new(trimmer),
        })
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let trimmer = RecordingTrimmer::default();
        let batch = batch(trimmer.clone());
        let entries = [entry("missing"), entry("speech_first"), entry("good")];

        let mut seen = Vec::new();
        let summary = batch.run(&entries, |entry, result| {
            seen.push((entry.recording_id.clone(), result.is_ok()));
        });

        assert_eq!(summary.processed(), 3);
        assert_eq!(summary.trimmed.len(), 1);
        assert_eq!(summary.failed.len(), 2);
        assert_eq!(summary.failed[0].recording_id, "missing");
        assert!(summary.failed[1].reason.contains("does not start with a silence"));
        assert_eq!(
            seen,
            vec![
                ("missing".to_string(), false),
                ("speech_first".to_string(), false),
                ("good".to_string(), true),
            ]
        );

        let calls = trimmer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PathBuf::from("audio/good.flac"));
        assert_eq!(calls[0].1, PathBuf::from("trimmed/good.wav"));
        assert_eq!(calls[0].2.len(), 4);
    }

    #[test]
    fn trimmed_record_reports_durations() {
        let batch = batch(RecordingTrimmer::default());
        let trimmed = batch.process(&entry("good")).unwrap();
        assert!((trimmed.original_duration - 7.0).abs() < 1e-9);
        // [0.7, 3.25] + [4.25, 6.3]
        assert!((trimmed.kept_duration - 4.6).abs() < 1e-9);
    }
}
