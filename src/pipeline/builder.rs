use std::fs;
use std::path::PathBuf;

use crate::alignment::TierSelector;
use crate::config::{TrimOutputConfig, TrimPolicy};
use crate::error::CorpusError;
use crate::pipeline::defaults::{SoxTrimmer, TextGridDirectory};
use crate::pipeline::runtime::{TrimBatch, TrimBatchParts};
use crate::pipeline::traits::{AlignmentSource, AudioTrimmer};

pub struct TrimBatchBuilder {
    output_dir: PathBuf,
    policy: TrimPolicy,
    alignments_dir: Option<PathBuf>,
    tier_selector: TierSelector,
    output_config: TrimOutputConfig,
    dry_run: bool,
    alignment_source: Option<Box<dyn AlignmentSource>>,
    trimmer: Option<Box<dyn AudioTrimmer>>,
}

impl TrimBatchBuilder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            policy: TrimPolicy::default(),
            alignments_dir: None,
            tier_selector: TierSelector::First,
            output_config: TrimOutputConfig::default(),
            dry_run: false,
            alignment_source: None,
            trimmer: None,
        }
    }

    pub fn with_policy(mut self, policy: TrimPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_alignments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.alignments_dir = Some(dir.into());
        self
    }

    pub fn with_tier_selector(mut self, selector: TierSelector) -> Self {
        self.tier_selector = selector;
        self
    }

    pub fn with_output_config(mut self, output_config: TrimOutputConfig) -> Self {
        self.output_config = output_config;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_alignment_source(mut self, alignment_source: Box<dyn AlignmentSource>) -> Self {
        self.alignment_source = Some(alignment_source);
        self
    }

    pub fn with_trimmer(mut self, trimmer: Box<dyn AudioTrimmer>) -> Self {
        self.trimmer = Some(trimmer);
        self
    }

    pub fn build(self) -> Result<TrimBatch, CorpusError> {
        self.policy.validate()?;
        if self.output_config.sample_rate_hz == 0 {
            return Err(CorpusError::invalid_input("output sample rate must be > 0"));
        }

        let alignment_source = match (self.alignment_source, self.alignments_dir) {
            (Some(source), _) => source,
            (None, Some(dir)) => {
                if !dir.is_dir() {
                    return Err(CorpusError::invalid_input(format!(
                        "alignments directory '{}' does not exist",
                        dir.display()
                    )));
                }
                Box::new(TextGridDirectory::new(dir, self.tier_selector))
            }
            (None, None) => {
                return Err(CorpusError::invalid_input(
                    "an alignments directory or alignment source is required",
                ))
            }
        };

        if !self.dry_run {
            fs::create_dir_all(&self.output_dir).map_err(|err| {
                CorpusError::io("creating output directory", &self.output_dir, err)
            })?;
        }

        let trimmer = self.trimmer.unwrap_or_else(|| {
            Box::new(SoxTrimmer::new(self.output_config).dry_run(self.dry_run))
        });

        Ok(TrimBatch::from_parts(TrimBatchParts {
            policy: self.policy,
            output_dir: self.output_dir,
            alignment_source,
            trimmer,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_alignment_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrimBatchBuilder::new(dir.path().join("out"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, CorpusError::InvalidInput { .. }));
    }

    #[test]
    fn build_rejects_missing_alignments_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = TrimBatchBuilder::new(dir.path().join("out"))
            .with_alignments_dir(dir.path().join("no-such-dir"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn build_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("trimmed");
        let batch = TrimBatchBuilder::new(&out)
            .with_alignments_dir(dir.path())
            .with_policy(TrimPolicy::from_millis(200, 400))
            .build()
            .unwrap();
        assert!(out.is_dir());
        assert_eq!(batch.output_path("rec"), out.join("rec.wav"));
        assert!((batch.policy().max_pause - 0.4).abs() < 1e-12);
    }

    #[test]
    fn dry_run_leaves_output_dir_alone() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("trimmed");
        TrimBatchBuilder::new(&out)
            .with_alignments_dir(dir.path())
            .with_dry_run(true)
            .build()
            .unwrap();
        assert!(!out.exists());
    }
}
