use std::env;
use std::path::PathBuf;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use speech_corpus_tools::config::ReviewCommands;
use speech_corpus_tools::review::{
    select_rows, ColumnRef, ReviewColumns, ReviewPlayer, ReviewSample, ReviewTable,
};

use crate::require_path_exists;

const RULE_WIDTH: usize = 30;

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// `.csv` (comma) or tab separated table of samples.
    #[arg(long, env = "CORPUS_TOOLS_REVIEW_TABLE")]
    table: PathBuf,
    /// Folder the audio column is relative to.
    #[arg(long, env = "CORPUS_TOOLS_AUDIO_FOLDER")]
    audio_folder: PathBuf,
    /// Audio column: a header name with `--header`, else a zero-based index.
    #[arg(long, default_value = "0")]
    audio_column: String,
    #[arg(long, default_value = "1")]
    text_column: String,
    /// Start timestamp column (`HH:MM:SS:XXX`).
    #[arg(long)]
    start: Option<String>,
    /// End timestamp column (`HH:MM:SS:XXX`).
    #[arg(long)]
    end: Option<String>,
    /// The first table row holds column names.
    #[arg(long)]
    header: bool,
    #[arg(long, default_value_t = 20)]
    count: usize,
    #[arg(long)]
    shuffle: bool,
    /// Seed for `--shuffle`; a fresh seed is drawn when absent.
    #[arg(long, env = "CORPUS_TOOLS_REVIEW_SEED")]
    seed: Option<u64>,
    /// Cut each sample into a temporary clip before playing it.
    #[arg(long)]
    convert: bool,
    #[arg(long, env = "CONVERT_CMD", default_value = ReviewCommands::DEFAULT_CONVERT)]
    convert_cmd: String,
    #[arg(long, env = "PLAY_CMD", default_value = ReviewCommands::DEFAULT_PLAY)]
    play_cmd: String,
    /// Where converted clips are written.
    #[arg(long, env = "CORPUS_TOOLS_CLIP")]
    clip: Option<PathBuf>,
}

pub fn run(args: ReviewArgs) -> Result<(), String> {
    require_path_exists(&args.table, "Review table not found.")?;
    require_path_exists(&args.audio_folder, "Audio folder not found.")?;

    let column = |raw: &str| ColumnRef::parse(raw, args.header).map_err(|err| err.to_string());
    let columns = ReviewColumns::new(
        column(&args.audio_column)?,
        column(&args.text_column)?,
        args.start.as_deref().map(column).transpose()?,
        args.end.as_deref().map(column).transpose()?,
    )
    .map_err(|err| err.to_string())?;

    let table = ReviewTable::load(&args.table, args.header).map_err(|err| err.to_string())?;
    if table.is_empty() {
        return Err(format!("Table '{}' has no rows.", args.table.display()));
    }

    let mut rng = args.shuffle.then(|| match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    });
    let rows = select_rows(table.len(), args.count, rng.as_mut());

    let clip = args
        .clip
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("corpus_tools_review_clip.mp3"));
    let commands = ReviewCommands {
        convert: args.convert_cmd.clone(),
        play: args.play_cmd.clone(),
    };
    let player = ReviewPlayer::new(&commands, args.convert, clip);

    for (position, row) in rows.iter().enumerate() {
        let sample = ReviewSample::from_row(&table, *row, &columns, &args.audio_folder)
            .map_err(|err| format!("Row {}: {err}", row + 1))?;
        tracing::debug!(row, audio = %sample.audio.display(), "reviewing sample");

        player
            .prepare(&sample)
            .map_err(|err| format!("Row {}: {err}", row + 1))?;
        println!("{}", "=".repeat(RULE_WIDTH));
        println!("[{}/{}] {}", position + 1, rows.len(), sample.transcript);
        println!("{}", "=".repeat(RULE_WIDTH));
        player
            .play(&sample)
            .map_err(|err| format!("Row {}: {err}", row + 1))?;
    }
    Ok(())
}
