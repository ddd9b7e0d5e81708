use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::command::{run_shell, CommandTemplate};
use crate::config::ReviewCommands;
use crate::error::CorpusError;
use crate::review::table::{ReviewColumns, ReviewTable};
use crate::review::timestamp::{format_timestamp, parse_timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSample {
    pub audio: PathBuf,
    pub transcript: String,
    /// Start and stop in whole seconds.
    pub window: Option<(u64, u64)>,
}

impl ReviewSample {
    pub fn from_row(
        table: &ReviewTable,
        row: usize,
        columns: &ReviewColumns,
        audio_folder: &Path,
    ) -> Result<Self, CorpusError> {
        let audio = audio_folder.join(table.cell(row, &columns.audio)?);
        let transcript = table.cell(row, &columns.text)?.to_string();
        let window = match &columns.window {
            Some((start, end)) => {
                let start = parse_timestamp(table.cell(row, start)?)?;
                let stop = parse_timestamp(table.cell(row, end)?)?;
                Some((start, stop))
            }
            None => None,
        };
        Ok(Self {
            audio,
            transcript,
            window,
        })
    }

    fn placeholders(&self, output: &Path, seek: bool) -> HashMap<&'static str, String> {
        let mut values = HashMap::new();
        values.insert("audio", self.audio.display().to_string());
        values.insert("output", output.display().to_string());
        if let Some((start, stop)) = self.window {
            let duration = stop.saturating_sub(start);
            values.insert("start", start.to_string());
            values.insert("stop", stop.to_string());
            values.insert("duration", duration.to_string());
            values.insert("start_f", format_timestamp(start));
            values.insert("stop_f", format_timestamp(stop));
            values.insert("duration_f", format_timestamp(duration));
            if seek {
                values.insert(
                    "seek",
                    format!(
                        "-ss {} -t {}",
                        format_timestamp(start),
                        format_timestamp(duration)
                    ),
                );
            }
        }
        values
    }
}

pub struct ReviewPlayer {
    convert: Option<CommandTemplate>,
    play: CommandTemplate,
    clip_path: PathBuf,
}

impl ReviewPlayer {
    /// With `convert` set, each sample is first cut/transcoded to
    /// `clip_path` and that clip is played.
    pub fn new(commands: &ReviewCommands, convert: bool, clip_path: impl Into<PathBuf>) -> Self {
        Self {
            convert: convert.then(|| CommandTemplate::new(commands.convert.clone())),
            play: CommandTemplate::new(commands.play.clone()),
            clip_path: clip_path.into(),
        }
    }

    pub fn convert_command(&self, sample: &ReviewSample) -> Result<Option<String>, CorpusError> {
        self.convert
            .as_ref()
            .map(|template| template.render(&sample.placeholders(&self.clip_path, false)))
            .transpose()
    }

    pub fn play_command(&self, sample: &ReviewSample) -> Result<String, CorpusError> {
        let (output, seek) = if self.convert.is_some() {
            (self.clip_path.as_path(), false)
        } else {
            (sample.audio.as_path(), true)
        };
        self.play.render(&sample.placeholders(output, seek))
    }

    /// Run the conversion step, if any.
    pub fn prepare(&self, sample: &ReviewSample) -> Result<(), CorpusError> {
        if let Some(command) = self.convert_command(sample)? {
            run_shell(&command)?;
        }
        Ok(())
    }

    pub fn play(&self, sample: &ReviewSample) -> Result<(), CorpusError> {
        run_shell(&self.play_command(sample)?)
    }
}
