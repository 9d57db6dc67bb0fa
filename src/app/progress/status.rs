use serde::Serialize;

use super::tally::SeasonTally;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub(crate) enum ViewStatus {
    NotStarted,
    Watching,
    Completed,
}

impl ViewStatus {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::Watching => "Watching",
            Self::Completed => "Completed",
        }
    }

    // In-progress series surface first, finished ones last.
    pub(crate) fn sort_rank(self) -> u8 {
        match self {
            Self::Watching => 0,
            Self::NotStarted => 1,
            Self::Completed => 2,
        }
    }
}

pub(crate) fn classify(tally: &SeasonTally) -> ViewStatus {
    if tally.total > 0 && tally.watched == tally.total {
        ViewStatus::Completed
    } else if tally.watched > 0 {
        ViewStatus::Watching
    } else {
        ViewStatus::NotStarted
    }
}
