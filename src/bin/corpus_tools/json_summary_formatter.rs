use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use speech_corpus_tools::{BatchSummary, FailedRecording, TrimPolicy, TrimmedRecording};

#[derive(Debug, Serialize)]
pub struct TrimSummaryReport<'a> {
    pub generated_at: String,
    pub dry_run: bool,
    pub policy: TrimPolicy,
    pub processed: usize,
    pub trimmed: &'a [TrimmedRecording],
    pub failed: &'a [FailedRecording],
}

impl<'a> TrimSummaryReport<'a> {
    pub fn new(policy: TrimPolicy, dry_run: bool, summary: &'a BatchSummary) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            dry_run,
            policy,
            processed: summary.processed(),
            trimmed: &summary.trimmed,
            failed: &summary.failed,
        }
    }
}

pub fn write_summary(path: &Path, report: &TrimSummaryReport<'_>) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create summary output directory '{}': {err}",
                parent.display()
            )
        })?;
    }

    let mut file = File::create(path)
        .map_err(|err| format!("Failed to create summary file '{}': {err}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, report).map_err(|err| {
        format!(
            "Failed to serialize summary JSON '{}': {err}",
            path.display()
        )
    })?;
    file.write_all(b"\n")
        .map_err(|err| format!("Failed to finalize summary file '{}': {err}", path.display()))?;
    Ok(())
}
