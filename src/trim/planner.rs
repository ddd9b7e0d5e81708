use crate::config::TrimPolicy;
use crate::error::{CorpusError, TierViolation};
use crate::types::{AlignmentTier, CutPlan};

/// Plan the spans of a recording to keep so that leading/trailing silence is
/// at most `max_padding` and no interior pause exceeds `max_pause`.
///
/// Speech intervals are never cut. A long interior silence is shrunk to
/// exactly `max_pause`, centered on the gap.
pub fn plan_cuts(tier: &AlignmentTier, policy: &TrimPolicy) -> Result<CutPlan, CorpusError> {
    policy.validate()?;
    let (first, last) = match tier.intervals.as_slice() {
        [first, .., last] => (first, last),
        intervals => {
            return Err(CorpusError::precondition(TierViolation::TooFewIntervals {
                count: intervals.len(),
            }))
        }
    };
    if !first.is_silence() {
        return Err(CorpusError::precondition(TierViolation::SpeechAtStart {
            mark: first.mark.clone(),
        }));
    }
    if !last.is_silence() {
        return Err(CorpusError::precondition(TierViolation::SpeechAtEnd {
            mark: last.mark.clone(),
        }));
    }

    let start = (first.max_time - policy.max_padding).max(0.0);
    let end = (last.min_time + policy.max_padding).min(last.max_time);

    let half_pause = policy.max_pause / 2.0;
    let interior = &tier.intervals[1..tier.intervals.len() - 1];
    let mut boundaries = Vec::with_capacity(interior.len() * 2 + 2);
    boundaries.push(start);
    for interval in interior {
        if interval.is_silence() && interval.duration() > policy.max_pause {
            boundaries.push(interval.min_time + half_pause);
            boundaries.push(interval.max_time - half_pause);
        }
    }
    boundaries.push(end);

    if boundaries.len() % 2 != 0 {
        return Err(CorpusError::Invariant {
            boundary_count: boundaries.len(),
        });
    }

    let segment_lengths = segment_lengths(&boundaries);
    tracing::debug!(
        tier = tier.name.as_str(),
        start,
        end,
        boundaries = boundaries.len(),
        "planned cuts"
    );
    Ok(CutPlan {
        boundaries,
        segment_lengths,
    })
}

fn segment_lengths(boundaries: &[f64]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(boundaries.len());
    let mut previous = 0.0;
    for &boundary in boundaries {
        lengths.push(boundary - previous);
        previous = boundary;
    }
    lengths
}
