use std::path::PathBuf;

use clap::Args;
use speech_corpus_tools::lobe::{
    natural_text_map, restore_natural_index, LobeDataset, PunctuationNormalizer,
};

use crate::require_path_exists;

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// LOBE export the corpus was prepared from.
    #[arg(long, env = "CORPUS_TOOLS_LOBE")]
    lobe: PathBuf,
    /// Corpus index with the recording id first and normalized text last.
    #[arg(long, env = "CORPUS_TOOLS_CORPUS_INDEX")]
    index: PathBuf,
    #[arg(long, default_value = "index.nat.tsv")]
    out: PathBuf,
    /// Same substitutions file the corpus was prepared with.
    #[arg(long, env = "CORPUS_TOOLS_SUBSTITUTIONS")]
    substitutions: Option<PathBuf>,
}

pub fn run(args: RestoreArgs) -> Result<(), String> {
    require_path_exists(&args.lobe, "LOBE folder not found.")?;
    require_path_exists(&args.index, "Corpus index not found.")?;

    let dataset = LobeDataset::load(&args.lobe).map_err(|err| err.to_string())?;
    let normalizer = match &args.substitutions {
        Some(path) => {
            PunctuationNormalizer::from_substitutions_file(path).map_err(|err| err.to_string())?
        }
        None => PunctuationNormalizer::new(),
    };
    let natural = natural_text_map(&dataset, &normalizer);
    let summary =
        restore_natural_index(&args.index, &args.out, &natural).map_err(|err| err.to_string())?;

    tracing::info!(
        out = %args.out.display(),
        written = summary.written,
        unknown = summary.unknown.len(),
        "restored natural transcripts"
    );
    Ok(())
}
