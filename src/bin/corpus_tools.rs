use std::path::Path;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[path = "corpus_tools/json_summary_formatter.rs"]
mod json_summary_formatter;
#[path = "corpus_tools/prep_command.rs"]
mod prep_command;
#[path = "corpus_tools/restore_command.rs"]
mod restore_command;
#[path = "corpus_tools/review_command.rs"]
mod review_command;
#[path = "corpus_tools/trim_command.rs"]
mod trim_command;

#[derive(Debug, Parser)]
#[command(name = "corpus_tools")]
#[command(about = "Prepare, review and silence-trim forced-aligned speech corpora")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Shorten long silences in recordings using their TextGrid alignments.
    Trim(trim_command::TrimArgs),
    /// Listen to a sample of rows from a transcription table.
    Review(review_command::ReviewArgs),
    /// Convert a LOBE export into a flat `.wav` + `.lab` aligner corpus.
    PrepLobe(prep_command::PrepArgs),
    /// Add natural transcripts back to a normalized corpus index.
    RestoreIndex(restore_command::RestoreArgs),
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), String> {
    match Args::parse().command {
        Command::Trim(args) => trim_command::run(args),
        Command::Review(args) => review_command::run(args),
        Command::PrepLobe(args) => prep_command::run(args),
        Command::RestoreIndex(args) => restore_command::run(args),
    }
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");
    progress
}
