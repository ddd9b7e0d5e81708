use std::path::PathBuf;

use clap::Args;
use speech_corpus_tools::{
    read_recording_index, TierSelector, TrimBatchBuilder, TrimOutputConfig, TrimPolicy,
};

use crate::json_summary_formatter::{write_summary, TrimSummaryReport};
use crate::{progress_bar, require_path_exists};

#[derive(Debug, Args)]
pub struct TrimArgs {
    /// Tab separated index: recording id, audio path.
    #[arg(long, env = "CORPUS_TOOLS_INDEX")]
    index: PathBuf,
    /// Folder holding `<recording_id>.TextGrid` alignments.
    #[arg(long, env = "CORPUS_TOOLS_ALIGNMENTS")]
    alignments: PathBuf,
    #[arg(long, env = "CORPUS_TOOLS_OUT")]
    out: PathBuf,
    /// Silence kept before the first and after the last word, in ms.
    #[arg(
        long,
        env = "CORPUS_TOOLS_MAX_PADDING_MS",
        default_value_t = TrimPolicy::DEFAULT_MAX_PADDING_MS
    )]
    max_padding: u64,
    /// Longest pause kept between words, in ms.
    #[arg(
        long,
        env = "CORPUS_TOOLS_MAX_PAUSE_MS",
        default_value_t = TrimPolicy::DEFAULT_MAX_PAUSE_MS
    )]
    max_pause: u64,
    #[arg(
        long,
        env = "CORPUS_TOOLS_RATE",
        default_value_t = TrimOutputConfig::DEFAULT_SAMPLE_RATE_HZ
    )]
    rate: u32,
    /// Interval tier to read; defaults to the first one.
    #[arg(long, env = "CORPUS_TOOLS_TIER")]
    tier: Option<String>,
    #[arg(long, env = "CORPUS_TOOLS_SOX", default_value = "sox")]
    sox: String,
    /// Print the sox commands instead of running them.
    #[arg(long)]
    dry_run: bool,
    /// Write a JSON summary of the planned cuts and failures here.
    #[arg(long, env = "CORPUS_TOOLS_SUMMARY_OUT")]
    summary_out: Option<PathBuf>,
}

pub fn run(args: TrimArgs) -> Result<(), String> {
    require_path_exists(&args.index, "Recording index not found.")?;
    require_path_exists(&args.alignments, "Alignments folder not found.")?;

    let entries = read_recording_index(&args.index).map_err(|err| err.to_string())?;
    if entries.is_empty() {
        return Err(format!(
            "No recordings found in index '{}'.",
            args.index.display()
        ));
    }

    let policy = TrimPolicy::from_millis(args.max_padding, args.max_pause);
    let tier_selector = args.tier.map_or(TierSelector::First, TierSelector::Named);
    let batch = TrimBatchBuilder::new(&args.out)
        .with_policy(policy)
        .with_alignments_dir(&args.alignments)
        .with_tier_selector(tier_selector)
        .with_output_config(TrimOutputConfig {
            sox_program: args.sox,
            sample_rate_hz: args.rate,
            ..TrimOutputConfig::default()
        })
        .with_dry_run(args.dry_run)
        .build()
        .map_err(|err| format!("Failed to set up trim batch: {err}"))?;

    let progress = progress_bar(entries.len());

    let summary = batch.run(&entries, |entry, _| {
        progress.set_message(entry.recording_id.clone());
        progress.inc(1);
    });
    progress.finish_with_message("done");

    tracing::info!(
        trimmed = summary.trimmed.len(),
        failed = summary.failed.len(),
        "trim batch finished"
    );

    if let Some(path) = &args.summary_out {
        let report = TrimSummaryReport::new(policy, args.dry_run, &summary);
        write_summary(path, &report)?;
        tracing::info!(path = %path.display(), "wrote trim summary");
    }
    Ok(())
}
