use std::fs;
use std::path::Path;

use textgrid::{TextGrid, TierType};

use crate::error::CorpusError;
use crate::types::{AlignmentTier, Interval};

/// Which interval tier of a TextGrid to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TierSelector {
    /// The first IntervalTier in file order (the words tier in MFA output).
    #[default]
    First,
    /// Case-insensitive tier name match.
    Named(String),
}

impl TierSelector {
    fn matches(&self, tier_index: usize, name: &str) -> bool {
        match self {
            Self::First => tier_index == 0,
            Self::Named(wanted) => name.eq_ignore_ascii_case(wanted),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::First => "any IntervalTier".to_string(),
            Self::Named(name) => format!("IntervalTier named '{name}'"),
        }
    }
}

/// Read one interval tier from a Praat TextGrid.
///
/// The textgrid crate is tried first; files it rejects (some aligners emit
/// slightly non-standard headers) go through a line-based long-format parser.
pub fn read_alignment_tier(
    path: &Path,
    selector: &TierSelector,
) -> Result<AlignmentTier, CorpusError> {
    match read_with_textgrid_crate(path, selector) {
        Ok(tier) => Ok(tier),
        Err(crate_err) => {
            let contents = fs::read_to_string(path)
                .map_err(|err| CorpusError::io("reading TextGrid", path, err))?;
            parse_interval_tier_fallback(&contents, selector).map_err(|fallback_err| {
                CorpusError::textgrid(
                    path,
                    format!(
                        "textgrid crate ({crate_err}) and fallback parser ({fallback_err}) \
                         both failed"
                    ),
                )
            })
        }
    }
}

fn read_with_textgrid_crate(path: &Path, selector: &TierSelector) -> Result<AlignmentTier, String> {
    let textgrid =
        TextGrid::from_file(path).map_err(|err| format!("textgrid crate parse failed: {err}"))?;

    let tier = textgrid
        .tiers
        .iter()
        .filter(|tier| tier.tier_type == TierType::IntervalTier)
        .enumerate()
        .find(|(index, tier)| selector.matches(*index, &tier.name))
        .map(|(_, tier)| tier)
        .ok_or_else(|| format!("missing {}", selector.describe()))?;

    let intervals = tier
        .intervals
        .iter()
        .map(|interval| Interval::new(interval.xmin, interval.xmax, interval.text.trim()))
        .collect::<Vec<_>>();
    tracing::debug!(
        path = %path.display(),
        tier = tier.name.as_str(),
        intervals = intervals.len(),
        "read alignment tier"
    );
    Ok(AlignmentTier::new(tier.name.clone(), intervals))
}

pub(crate) fn parse_interval_tier_fallback(
    contents: &str,
    selector: &TierSelector,
) -> Result<AlignmentTier, String> {
    let mut interval_tier_index = 0usize;
    let mut in_item = false;
    let mut item_is_interval_tier = false;
    let mut item_name: Option<String> = None;
    let mut selected = false;

    let mut cur_xmin: Option<f64> = None;
    let mut cur_xmax: Option<f64> = None;
    let mut in_interval = false;
    let mut intervals = Vec::new();
    let mut tier_name = String::new();

    for raw_line in contents.lines() {
        let line = raw_line.trim();
        if line.starts_with("item [") {
            if selected {
                break;
            }
            in_item = true;
            item_is_interval_tier = false;
            item_name = None;
            in_interval = false;
            continue;
        }

        if !in_item {
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "class") {
            item_is_interval_tier = value.eq_ignore_ascii_case("\"IntervalTier\"");
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "name") {
            let name = strip_quotes(value).to_string();
            if item_is_interval_tier {
                selected = selector.matches(interval_tier_index, &name);
                interval_tier_index += 1;
                if selected {
                    tier_name = name.clone();
                }
            }
            item_name = Some(name);
            continue;
        }

        if !selected || item_name.is_none() {
            continue;
        }

        if line.starts_with("intervals [") {
            in_interval = true;
            cur_xmin = None;
            cur_xmax = None;
            continue;
        }

        if !in_interval {
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "xmin") {
            cur_xmin = Some(parse_number(value, "xmin")?);
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "xmax") {
            cur_xmax = Some(parse_number(value, "xmax")?);
            continue;
        }

        if let Some(value) = parse_assignment_value(line, "text") {
            let xmin = cur_xmin.ok_or_else(|| "missing xmin before text".to_string())?;
            let xmax = cur_xmax.ok_or_else(|| "missing xmax before text".to_string())?;
            let mark = unescape_praat_text(strip_quotes(value)).trim().to_string();
            intervals.push(Interval::new(xmin, xmax, mark));
            in_interval = false;
        }
    }

    if !selected {
        return Err(format!("missing {}", selector.describe()));
    }
    if intervals.is_empty() {
        return Err(format!("tier '{tier_name}' has no intervals"));
    }
    Ok(AlignmentTier::new(tier_name, intervals))
}

fn parse_assignment_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (lhs, rhs) = line.split_once('=')?;
    if lhs.trim() == key {
        Some(rhs.trim())
    } else {
        None
    }
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}

// Praat doubles embedded quotes.
fn unescape_praat_text(value: &str) -> String {
    value.replace("\"\"", "\"")
}

fn parse_number(value: &str, field: &str) -> Result<f64, String> {
    let number = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse {field}='{value}': {err}"))?;
    if !number.is_finite() || number < 0.0 {
        return Err(format!("invalid {field} timestamp: {number}"));
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TIERS: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 2.5
tiers? <exists>
size = 2
item []:
    item [1]:
        class = "IntervalTier"
        name = "words"
        xmin = 0
        xmax = 2.5
        intervals: size = 3
        intervals [1]:
            xmin = 0
            xmax = 0.6
            text = ""
        intervals [2]:
            xmin = 0.6
            xmax = 1.9
            text = "góðan"
        intervals [3]:
            xmin = 1.9
            xmax = 2.5
            text = ""
    item [2]:
        class = "IntervalTier"
        name = "phones"
        xmin = 0
        xmax = 2.5
        intervals: size = 2
        intervals [1]:
            xmin = 0
            xmax = 1.2
            text = "g"
        intervals [2]:
            xmin = 1.2
            xmax = 2.5
            text = ""
"#;

    #[test]
    fn fallback_reads_first_interval_tier() {
        let tier = parse_interval_tier_fallback(TWO_TIERS, &TierSelector::First).unwrap();
        assert_eq!(tier.name, "words");
        assert_eq!(tier.intervals.len(), 3);
        assert!(tier.intervals[0].is_silence());
        assert_eq!(tier.intervals[1].mark, "góðan");
        assert_eq!(tier.intervals[1].min_time, 0.6);
        assert_eq!(tier.intervals[2].max_time, 2.5);
    }

    #[test]
    fn fallback_reads_named_tier() {
        let selector = TierSelector::Named("PHONES".to_string());
        let tier = parse_interval_tier_fallback(TWO_TIERS, &selector).unwrap();
        assert_eq!(tier.name, "phones");
        assert_eq!(tier.intervals.len(), 2);
        assert_eq!(tier.intervals[0].mark, "g");
    }

    #[test]
    fn fallback_reports_missing_tier() {
        let selector = TierSelector::Named("syllables".to_string());
        let err = parse_interval_tier_fallback(TWO_TIERS, &selector).unwrap_err();
        assert!(err.contains("syllables"));
    }

    #[test]
    fn fallback_rejects_bad_timestamp() {
        let broken = TWO_TIERS.replace("xmax = 0.6", "xmax = soon");
        let err = parse_interval_tier_fallback(&broken, &TierSelector::First).unwrap_err();
        assert!(err.contains("xmax"));
    }

    #[test]
    fn read_alignment_tier_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.TextGrid");
        fs::write(&path, TWO_TIERS).unwrap();

        let tier = read_alignment_tier(&path, &TierSelector::First).unwrap();
        assert_eq!(tier.intervals.len(), 3);
        assert!((tier.duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn read_alignment_tier_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_alignment_tier(&dir.path().join("nope.TextGrid"), &TierSelector::First)
            .unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
