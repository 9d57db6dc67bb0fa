use std::cmp::{Ordering, Reverse};

use chrono::NaiveDateTime;
use serde::Serialize;

use super::genre::{GenreSet, normalize_genres};
use super::pointer::{WatchPointer, decode_progress};
use super::status::{ViewStatus, classify};
use super::tally::{SeasonTally, SegmentError, decode_tally_with};

pub(crate) const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct RawRecord {
    pub(crate) name: String,
    pub(crate) year: Option<i32>,
    pub(crate) plot: Option<String>,
    pub(crate) genre: Option<String>,
    pub(crate) external_id: Option<String>,
    pub(crate) progress_code: String,
    pub(crate) tally_code: String,
    pub(crate) stored_view_status: Option<String>,
    pub(crate) rating: Option<String>,
    pub(crate) updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct EnrichedRecord {
    pub(crate) raw: RawRecord,
    pub(crate) pointer: WatchPointer,
    pub(crate) tally: SeasonTally,
    pub(crate) status: ViewStatus,
    pub(crate) genres: GenreSet,
    #[serde(skip)]
    pub(crate) last_seen: Option<NaiveDateTime>,
    #[serde(skip)]
    pub(crate) skipped_segments: Vec<SegmentError>,
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
pub(crate) fn enrich_record(raw: RawRecord) -> EnrichedRecord {
    enrich_record_with(raw, |_, _| {})
}

pub(crate) fn enrich_record_with<F>(raw: RawRecord, mut on_skip: F) -> EnrichedRecord
where
    F: FnMut(&str, &SegmentError),
{
    let pointer = decode_progress(&raw.progress_code);
    let decoded = decode_tally_with(&raw.tally_code, |err| on_skip(&raw.name, err));
    let status = classify(&decoded.tally);
    let genres = raw.genre.as_deref().map(normalize_genres).unwrap_or_default();
    let last_seen = pointer.watched_at.as_deref().and_then(parse_timestamp);

    EnrichedRecord {
        raw,
        pointer,
        tally: decoded.tally,
        status,
        genres,
        last_seen,
        skipped_segments: decoded.skipped,
    }
}

pub(crate) fn compare_enriched(a: &EnrichedRecord, b: &EnrichedRecord) -> Ordering {
    a.status
        .sort_rank()
        .cmp(&b.status.sort_rank())
        .then_with(|| Reverse(a.last_seen).cmp(&Reverse(b.last_seen)))
}

// Stable: records with equal keys keep their input order.
pub(crate) fn sort_enriched(records: &mut [EnrichedRecord]) {
    records.sort_by(compare_enriched);
}

pub(crate) fn enrich_and_sort<I, F>(raws: I, mut on_skip: F) -> Vec<EnrichedRecord>
where
    I: IntoIterator<Item = RawRecord>,
    F: FnMut(&str, &SegmentError),
{
    let mut records = raws
        .into_iter()
        .map(|raw| enrich_record_with(raw, &mut on_skip))
        .collect::<Vec<_>>();
    sort_enriched(&mut records);
    records
}
