use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// Seconds; the interval is [min_time, max_time).
    pub min_time: f64,
    pub max_time: f64,
    /// Empty for silence, the aligned word or phone otherwise.
    pub mark: String,
}

impl Interval {
    pub fn new(min_time: f64, max_time: f64, mark: impl Into<String>) -> Self {
        Self {
            min_time,
            max_time,
            mark: mark.into(),
        }
    }

    pub fn silence(min_time: f64, max_time: f64) -> Self {
        Self::new(min_time, max_time, "")
    }

    pub fn is_silence(&self) -> bool {
        self.mark.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.max_time - self.min_time
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentTier {
    pub name: String,
    pub intervals: Vec<Interval>,
}

impl AlignmentTier {
    pub fn new(name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }

    pub fn duration(&self) -> f64 {
        self.intervals.last().map_or(0.0, |interval| interval.max_time)
    }
}

/// Boundaries of the spans to keep, in seconds.
///
/// `[b0, b1]` is kept, `[b1, b2]` dropped, and so on; the boundary count is
/// always even so the last span is a kept one. `segment_lengths` holds the
/// same information as successive durations starting from 0, which is what
/// the `sox trim` effect expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutPlan {
    pub boundaries: Vec<f64>,
    pub segment_lengths: Vec<f64>,
}

impl CutPlan {
    pub fn start(&self) -> f64 {
        self.boundaries.first().copied().unwrap_or(0.0)
    }

    pub fn end(&self) -> f64 {
        self.boundaries.last().copied().unwrap_or(0.0)
    }

    pub fn kept_spans(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.boundaries
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }

    pub fn kept_duration(&self) -> f64 {
        self.kept_spans().map(|(start, end)| end - start).sum()
    }

    /// Segment lengths formatted for a `trim` effect argument list.
    pub fn trim_spans(&self, decimals: usize) -> Vec<String> {
        self.segment_lengths
            .iter()
            .map(|length| format!("{length:.decimals$}"))
            .collect()
    }
}

/// One row of the recording index fed to the trim batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingEntry {
    pub recording_id: String,
    pub audio_path: PathBuf,
}

/// One row of a LOBE `index.tsv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobeEntry {
    pub speaker: String,
    pub recording: String,
    pub text_file: String,
}

impl LobeEntry {
    /// Recording file name without its extension.
    pub fn recording_id(&self) -> &str {
        match self.recording.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.recording,
        }
    }
}
