use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub(crate) const NO_DATA_SENTINEL: &str = "#N/A";

static PROGRESS_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"S([0-9]{2})E([0-9]{2})\s*←-→\s*(.+)").expect("progress code pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PointerOrigin {
    NotStarted,
    Unparseable,
    Parsed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct WatchPointer {
    pub(crate) origin: PointerOrigin,
    pub(crate) season: Option<u32>,
    pub(crate) episode: Option<u32>,
    pub(crate) watched_at: Option<String>,
}

impl WatchPointer {
    pub(crate) fn not_started() -> Self {
        Self::absent(PointerOrigin::NotStarted)
    }

    pub(crate) fn unparseable() -> Self {
        Self::absent(PointerOrigin::Unparseable)
    }

    fn absent(origin: PointerOrigin) -> Self {
        Self {
            origin,
            season: None,
            episode: None,
            watched_at: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_absent(&self) -> bool {
        self.season.is_none() && self.episode.is_none() && self.watched_at.is_none()
    }

    pub(crate) fn position(&self) -> Option<(u32, u32)> {
        match (self.season, self.episode) {
            (Some(season), Some(episode)) => Some((season, episode)),
            _ => None,
        }
    }
}

pub(crate) fn is_no_data(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == NO_DATA_SENTINEL
}

// Format: `S<season:2>E<episode:2> ←-→ <timestamp>`; the match may start anywhere in the field.
pub(crate) fn decode_progress(raw: &str) -> WatchPointer {
    if is_no_data(raw) {
        return WatchPointer::not_started();
    }

    let Some(captures) = PROGRESS_CODE.captures(raw) else {
        return WatchPointer::unparseable();
    };

    let season = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
    let episode = captures.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
    let watched_at = captures.get(3).map(|m| m.as_str().to_string());
    let (Some(season), Some(episode)) = (season, episode) else {
        return WatchPointer::unparseable();
    };

    WatchPointer {
        origin: PointerOrigin::Parsed,
        season: Some(season),
        episode: Some(episode),
        watched_at,
    }
}
