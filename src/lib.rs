pub mod alignment;
pub mod command;
pub mod config;
pub mod error;
pub mod index;
pub mod lobe;
pub mod pipeline;
pub mod review;
pub mod trim;
pub mod types;

pub use alignment::{read_alignment_tier, TierSelector};
pub use config::{CorpusPrepConfig, ReviewCommands, TrimOutputConfig, TrimPolicy};
pub use error::{CorpusError, TierViolation};
pub use index::read_recording_index;
pub use pipeline::builder::TrimBatchBuilder;
pub use pipeline::runtime::{BatchSummary, FailedRecording, TrimBatch, TrimmedRecording};
pub use pipeline::traits::{AlignmentSource, AudioConverter, AudioTrimmer};
pub use trim::plan_cuts;
pub use types::{AlignmentTier, CutPlan, Interval, LobeEntry, RecordingEntry};
