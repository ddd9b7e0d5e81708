use std::path::Path;

use crate::error::CorpusError;
use crate::types::{AlignmentTier, CutPlan};

pub trait AlignmentSource: Send + Sync {
    fn load_tier(&self, recording_id: &str) -> Result<AlignmentTier, CorpusError>;
}

pub trait AudioTrimmer: Send + Sync {
    /// Write the kept spans of `source` to `output`.
    fn trim(&self, source: &Path, output: &Path, plan: &CutPlan) -> Result<(), CorpusError>;
}

pub trait AudioConverter: Send + Sync {
    fn convert(&self, source: &Path, output: &Path) -> Result<(), CorpusError>;
}
