use serde::Serialize;

use crate::error::CorpusError;

/// Silence budget applied when planning trims, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimPolicy {
    /// Leading/trailing silence kept around the speech.
    pub max_padding: f64,
    /// Longest interior pause kept between speech intervals.
    pub max_pause: f64,
}

impl TrimPolicy {
    pub const DEFAULT_MAX_PADDING_MS: u64 = 300;
    pub const DEFAULT_MAX_PAUSE_MS: u64 = 300;

    pub fn from_millis(max_padding_ms: u64, max_pause_ms: u64) -> Self {
        Self {
            max_padding: max_padding_ms as f64 / 1000.0,
            max_pause: max_pause_ms as f64 / 1000.0,
        }
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        for (name, value) in [("max_padding", self.max_padding), ("max_pause", self.max_pause)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CorpusError::invalid_input(format!(
                    "{name} must be a finite, non-negative number of seconds (got {value})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self::from_millis(Self::DEFAULT_MAX_PADDING_MS, Self::DEFAULT_MAX_PAUSE_MS)
    }
}

#[derive(Debug, Clone)]
pub struct TrimOutputConfig {
    pub sox_program: String,
    pub sample_rate_hz: u32,
    /// Decimal places used for the `trim` effect positions.
    pub span_decimals: usize,
}

impl TrimOutputConfig {
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;
    pub const DEFAULT_SPAN_DECIMALS: usize = 3;
}

impl Default for TrimOutputConfig {
    fn default() -> Self {
        Self {
            sox_program: "sox".to_string(),
            sample_rate_hz: Self::DEFAULT_SAMPLE_RATE_HZ,
            span_decimals: Self::DEFAULT_SPAN_DECIMALS,
        }
    }
}

/// Shell templates used by the review sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommands {
    pub convert: String,
    pub play: String,
}

impl ReviewCommands {
    pub const DEFAULT_CONVERT: &'static str =
        r#"ffmpeg -nostats -hide_banner -y -i "{audio}" -ss {start} -to {stop} -q:a 0 -map a "{output}""#;
    pub const DEFAULT_PLAY: &'static str = r#"ffplay -nodisp -autoexit "{output}" {seek}"#;
}

impl Default for ReviewCommands {
    fn default() -> Self {
        Self {
            convert: Self::DEFAULT_CONVERT.to_string(),
            play: Self::DEFAULT_PLAY.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorpusPrepConfig {
    pub sox_program: String,
    pub sample_rate_hz: u32,
    pub channels: u16,
}

impl CorpusPrepConfig {
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;
}

impl Default for CorpusPrepConfig {
    fn default() -> Self {
        Self {
            sox_program: "sox".to_string(),
            sample_rate_hz: Self::DEFAULT_SAMPLE_RATE_HZ,
            channels: 1,
        }
    }
}
