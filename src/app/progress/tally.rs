use serde::Serialize;
use thiserror::Error;

use super::pointer::is_no_data;

pub(crate) const SEASON_DELIMITER: char = '§';

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct SeasonTally {
    pub(crate) watched: u32,
    pub(crate) total: u32,
    pub(crate) percentage: f64,
}

impl SeasonTally {
    pub(crate) fn new(watched: u32, total: u32) -> Self {
        Self {
            watched,
            total,
            percentage: completion_percentage(watched, total),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(0, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SegmentError {
    #[error("segment {index} `{segment}` is not of the form watched/total")]
    Arity { index: usize, segment: String },
    #[error("segment {index} `{segment}` has a non-integer count")]
    NotInteger { index: usize, segment: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TallyDecode {
    pub(crate) tally: SeasonTally,
    pub(crate) skipped: Vec<SegmentError>,
}

#[cfg(test)]
pub(crate) fn decode_tally(raw: &str) -> SeasonTally {
    decode_tally_detailed(raw).tally
}

#[cfg(test)]
pub(crate) fn decode_tally_detailed(raw: &str) -> TallyDecode {
    decode_tally_with(raw, |_| {})
}

// Malformed segments never fail the decode; each one is reported to `on_skip` and left out of the sums.
pub(crate) fn decode_tally_with<F>(raw: &str, mut on_skip: F) -> TallyDecode
where
    F: FnMut(&SegmentError),
{
    if is_no_data(raw) {
        return TallyDecode {
            tally: SeasonTally::empty(),
            skipped: Vec::new(),
        };
    }

    let mut watched: u32 = 0;
    let mut total: u32 = 0;
    let mut skipped = Vec::new();
    for (index, segment) in raw.split(SEASON_DELIMITER).enumerate() {
        match parse_segment(index, segment) {
            Ok((w, t)) => {
                watched = watched.saturating_add(w);
                total = total.saturating_add(t);
            }
            Err(err) => {
                on_skip(&err);
                skipped.push(err);
            }
        }
    }

    TallyDecode {
        tally: SeasonTally::new(watched, total),
        skipped,
    }
}

fn parse_segment(index: usize, segment: &str) -> Result<(u32, u32), SegmentError> {
    let parts = segment.split('/').collect::<Vec<_>>();
    let [watched, total] = parts.as_slice() else {
        return Err(SegmentError::Arity {
            index,
            segment: segment.to_string(),
        });
    };

    let not_integer = || SegmentError::NotInteger {
        index,
        segment: segment.to_string(),
    };
    let watched = parse_count(watched).ok_or_else(not_integer)?;
    let total = parse_count(total).ok_or_else(not_integer)?;
    Ok((watched, total))
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

pub(crate) fn completion_percentage(watched: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = f64::from(watched) / f64::from(total) * 100.0;
    // Formatting rounds the exact binary value half-to-even.
    format!("{ratio:.1}")
        .parse::<f64>()
        .unwrap_or(ratio)
        .clamp(0.0, 100.0)
}
