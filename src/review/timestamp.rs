use crate::error::CorpusError;

/// Whole seconds from an `HH:MM:SS:XXX` stamp; the trailing field is ignored.
pub fn parse_timestamp(stamp: &str) -> Result<u64, CorpusError> {
    let parts = stamp.trim().split(':').collect::<Vec<_>>();
    let &[hours, minutes, seconds, _] = parts.as_slice() else {
        return Err(CorpusError::invalid_input(format!(
            "expected HH:MM:SS:XXX timestamp, got '{stamp}'"
        )));
    };
    let field = |value: &str, name: &str| {
        value.parse::<u64>().map_err(|err| {
            CorpusError::invalid_input(format!("invalid {name} in timestamp '{stamp}': {err}"))
        })
    };
    let hours = field(hours, "hours")?;
    let minutes = field(minutes, "minutes")?;
    let seconds = field(seconds, "seconds")?;
    hours
        .checked_mul(3600)
        .and_then(|total| total.checked_add(minutes.checked_mul(60)?))
        .and_then(|total| total.checked_add(seconds))
        .ok_or_else(|| CorpusError::invalid_input(format!("timestamp '{stamp}' is out of range")))
}

/// `HH:MM:SS.000`, the form ffmpeg/ffplay accept for `-ss` and `-t`.
pub fn format_timestamp(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}.000")
}
