use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which structural rule an alignment tier broke before planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierViolation {
    TooFewIntervals { count: usize },
    SpeechAtStart { mark: String },
    SpeechAtEnd { mark: String },
}

impl fmt::Display for TierViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewIntervals { count } => {
                write!(f, "tier has {count} interval(s), at least 2 are required")
            }
            Self::SpeechAtStart { mark } => {
                write!(f, "alignment does not start with a silence (found '{mark}')")
            }
            Self::SpeechAtEnd { mark } => {
                write!(f, "alignment does not end with a silence (found '{mark}')")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error while {context} '{}': {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("table error while {context}: {source}")]
    Csv {
        context: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read TextGrid '{}': {message}", .path.display())]
    TextGrid { path: PathBuf, message: String },
    #[error("missing alignment for recording '{recording_id}': {}", .path.display())]
    MissingArtifact { recording_id: String, path: PathBuf },
    #[error("precondition failed: {violation}")]
    Precondition { violation: TierViolation },
    #[error("invariant violated: cut plan has an odd number of boundaries ({boundary_count})")]
    Invariant { boundary_count: usize },
    #[error("external command '{program}' failed: {message}")]
    Process { program: String, message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl CorpusError {
    pub(crate) fn io(
        context: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(context: &'static str, source: csv::Error) -> Self {
        Self::Csv { context, source }
    }

    pub(crate) fn textgrid(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::TextGrid {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn process(program: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::Process {
            program: program.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn precondition(violation: TierViolation) -> Self {
        Self::Precondition { violation }
    }
}
