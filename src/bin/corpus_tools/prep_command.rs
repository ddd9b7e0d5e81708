use std::path::PathBuf;

use clap::Args;
use speech_corpus_tools::lobe::{CorpusPreparer, LobeDataset, PrepOptions, PunctuationNormalizer};
use speech_corpus_tools::pipeline::defaults::SoxConverter;
use speech_corpus_tools::CorpusPrepConfig;

use crate::{progress_bar, require_path_exists};

#[derive(Debug, Args)]
pub struct PrepArgs {
    /// LOBE export root containing `index.tsv`, `audio/` and `text/`.
    #[arg(long, env = "CORPUS_TOOLS_LOBE")]
    lobe: PathBuf,
    /// Corpus folder to create; must not exist yet.
    #[arg(long, env = "CORPUS_TOOLS_CORPUS")]
    corpus: PathBuf,
    /// Only prepare the first N index entries.
    #[arg(long)]
    max: Option<usize>,
    #[arg(
        long,
        env = "CORPUS_TOOLS_PREP_RATE",
        default_value_t = CorpusPrepConfig::DEFAULT_SAMPLE_RATE_HZ
    )]
    rate: u32,
    /// Also write a TSV index of what was prepared.
    #[arg(long, env = "CORPUS_TOOLS_PREP_INDEX")]
    index: Option<PathBuf>,
    /// Two-column TSV of text substitutions applied before normalizing.
    #[arg(long, env = "CORPUS_TOOLS_SUBSTITUTIONS")]
    substitutions: Option<PathBuf>,
    #[arg(long, env = "CORPUS_TOOLS_SOX", default_value = "sox")]
    sox: String,
}

pub fn run(args: PrepArgs) -> Result<(), String> {
    require_path_exists(&args.lobe, "LOBE folder not found.")?;
    if args.rate == 0 {
        return Err("--rate must be >= 1.".to_string());
    }

    let dataset = LobeDataset::load(&args.lobe).map_err(|err| err.to_string())?;
    let normalizer = match &args.substitutions {
        Some(path) => {
            PunctuationNormalizer::from_substitutions_file(path).map_err(|err| err.to_string())?
        }
        None => PunctuationNormalizer::new(),
    };
    let converter = SoxConverter::new(CorpusPrepConfig {
        sox_program: args.sox,
        sample_rate_hz: args.rate,
        ..CorpusPrepConfig::default()
    });
    let preparer = CorpusPreparer::new(&dataset, &converter, &normalizer);
    let options = PrepOptions {
        max_entries: args.max,
        index_path: args.index,
    };

    let available = dataset.entries().len();
    let progress = progress_bar(args.max.map_or(available, |max| max.min(available)));

    let summary = preparer
        .prepare(&args.corpus, &options, |entry, _| {
            progress.set_message(entry.recording.clone());
            progress.inc(1);
        })
        .map_err(|err| err.to_string())?;
    progress.finish_with_message("done");

    tracing::info!(
        corpus = %args.corpus.display(),
        prepared = summary.prepared.len(),
        failed = summary.failed.len(),
        "corpus preparation finished"
    );
    Ok(())
}
