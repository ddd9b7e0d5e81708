use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::alignment::{read_alignment_tier, TierSelector};
use crate::command::{display_arg, run_program};
use crate::config::{CorpusPrepConfig, TrimOutputConfig};
use crate::error::CorpusError;
use crate::pipeline::traits::{AlignmentSource, AudioConverter, AudioTrimmer};
use crate::types::{AlignmentTier, CutPlan};

/// `<dir>/<recording_id>.TextGrid`, as written by Montreal Forced Aligner.
pub struct TextGridDirectory {
    dir: PathBuf,
    selector: TierSelector,
}

impl TextGridDirectory {
    pub fn new(dir: impl Into<PathBuf>, selector: TierSelector) -> Self {
        Self {
            dir: dir.into(),
            selector,
        }
    }

    pub fn path_for(&self, recording_id: &str) -> PathBuf {
        self.dir.join(format!("{recording_id}.TextGrid"))
    }
}

impl AlignmentSource for TextGridDirectory {
    fn load_tier(&self, recording_id: &str) -> Result<AlignmentTier, CorpusError> {
        let path = self.path_for(recording_id);
        if !path.is_file() {
            return Err(CorpusError::MissingArtifact {
                recording_id: recording_id.to_string(),
                path,
            });
        }
        read_alignment_tier(&path, &self.selector)
    }
}

/// Trims with `sox <in> <out> rate <hz> trim <lengths...>`.
///
/// Output goes to a `.part.wav` sibling first and is renamed once sox
/// succeeds, so an interrupted run never leaves a truncated `<id>.wav`.
pub struct SoxTrimmer {
    config: TrimOutputConfig,
    dry_run: bool,
}

impl SoxTrimmer {
    pub fn new(config: TrimOutputConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Log the sox command line instead of running it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn args(&self, source: &Path, output: &Path, plan: &CutPlan) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            source.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
            "rate".into(),
            self.config.sample_rate_hz.to_string().into(),
            "trim".into(),
        ];
        args.extend(
            plan.trim_spans(self.config.span_decimals)
                .into_iter()
                .map(OsString::from),
        );
        args
    }

    pub fn command_line(&self, source: &Path, output: &Path, plan: &CutPlan) -> String {
        std::iter::once(OsStr::new(&self.config.sox_program).to_owned())
            .chain(self.args(source, output, plan))
            .map(|arg| display_arg(&arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl AudioTrimmer for SoxTrimmer {
    fn trim(&self, source: &Path, output: &Path, plan: &CutPlan) -> Result<(), CorpusError> {
        if self.dry_run {
            tracing::info!(command = %self.command_line(source, output, plan), "dry run");
            return Ok(());
        }

        let partial = partial_path(output);
        tracing::debug!(command = %self.command_line(source, &partial, plan), "running sox");
        if let Err(err) = run_program(&self.config.sox_program, self.args(source, &partial, plan)) {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }
        fs::rename(&partial, output)
            .map_err(|err| CorpusError::io("moving trimmed audio into place", output, err))
    }
}

/// Converts with `sox <in> -c <channels> -r <hz> <out>`.
pub struct SoxConverter {
    config: CorpusPrepConfig,
}

impl SoxConverter {
    pub fn new(config: CorpusPrepConfig) -> Self {
        Self { config }
    }

    pub fn args(&self, source: &Path, output: &Path) -> Vec<OsString> {
        vec![
            source.as_os_str().to_owned(),
            "-c".into(),
            self.config.channels.to_string().into(),
            "-r".into(),
            self.config.sample_rate_hz.to_string().into(),
            output.as_os_str().to_owned(),
        ]
    }
}

impl AudioConverter for SoxConverter {
    fn convert(&self, source: &Path, output: &Path) -> Result<(), CorpusError> {
        run_program(&self.config.sox_program, self.args(source, output)).map(|_| ())
    }
}

fn partial_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    let ext = output
        .extension()
        .map(OsStr::to_string_lossy)
        .unwrap_or_else(|| "wav".into());
    output.with_file_name(format!("{stem}.part.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> CutPlan {
        CutPlan {
            boundaries: vec![0.7, 3.25, 4.25, 6.3],
            segment_lengths: vec![0.7, 2.55, 1.0, 2.05],
        }
    }

    #[test]
    fn sox_trim_arguments() {
        let trimmer = SoxTrimmer::new(TrimOutputConfig {
            span_decimals: 2,
            ..TrimOutputConfig::default()
        });
        let line =
            trimmer.command_line(Path::new("in/rec.flac"), Path::new("out/rec.wav"), &plan());
        assert_eq!(
            line,
            "sox in/rec.flac out/rec.wav rate 44100 trim 0.70 2.55 1.00 2.05"
        );
    }

    #[test]
    fn sox_convert_arguments() {
        let converter = SoxConverter::new(CorpusPrepConfig::default());
        let args = converter.args(Path::new("a.flac"), Path::new("corpus/a.wav"));
        let args = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(args, ["a.flac", "-c", "1", "-r", "16000", "corpus/a.wav"]);
    }

    #[test]
    fn partial_path_keeps_extension() {
        assert_eq!(
            partial_path(Path::new("out/rec_1.wav")),
            PathBuf::from("out/rec_1.part.wav")
        );
    }

    #[test]
    fn dry_run_does_not_touch_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("rec.wav");
        let trimmer = SoxTrimmer::new(TrimOutputConfig::default()).dry_run(true);
        trimmer
            .trim(Path::new("missing.flac"), &output, &plan())
            .unwrap();
        assert!(!output.exists());
    }

    /// Stand-in for sox: writes its output argument, then exits with `code`.
    #[cfg(unix)]
    fn fake_sox(dir: &Path, code: i32) -> String {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join(format!("fake_sox_{code}.sh"));
        let body = format!("#!/bin/sh\nprintf 'RIFF' > \"$2\"\nexit {code}\n");
        fs::write(&script, body).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script.display().to_string()
    }

    #[cfg(unix)]
    #[test]
    fn successful_trim_renames_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("rec.wav");
        let trimmer = SoxTrimmer::new(TrimOutputConfig {
            sox_program: fake_sox(dir.path(), 0),
            ..TrimOutputConfig::default()
        });
        trimmer
            .trim(Path::new("in/rec.flac"), &output, &plan())
            .unwrap();
        assert!(output.is_file());
        assert!(!dir.path().join("rec.part.wav").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_trim_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("rec.wav");
        let trimmer = SoxTrimmer::new(TrimOutputConfig {
            sox_program: fake_sox(dir.path(), 2),
            ..TrimOutputConfig::default()
        });
        let err = trimmer
            .trim(Path::new("in/rec.flac"), &output, &plan())
            .unwrap_err();
        assert!(matches!(err, CorpusError::Process { .. }));
        assert!(!output.exists());
        assert!(!dir.path().join("rec.part.wav").exists());
    }

    #[test]
    fn missing_textgrid_is_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let source = TextGridDirectory::new(dir.path(), TierSelector::First);
        let err = source.load_tier("rec_9").unwrap_err();
        match err {
            CorpusError::MissingArtifact { recording_id, path } => {
                assert_eq!(recording_id, "rec_9");
                assert!(path.ends_with("rec_9.TextGrid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
