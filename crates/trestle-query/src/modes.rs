//! Query modes: named filter fragments merged over a caller's base filter.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use trestle_core::filter::TaskFilter;

use crate::sort::{SortKey, SortSpec};

/// The built-in modes. Each is a pure function producing filter fragments
/// and a default sort; none inspects record data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Open tasks whose due date has passed.
    Overdue,
    /// Open tasks due from now through the lookahead window.
    Upcoming,
    /// Tasks actionable right now.
    Available,
    /// Flagged open tasks.
    Flagged,
    /// Open tasks due on the current calendar day.
    Today,
}

impl QueryMode {
    pub const ALL: [QueryMode; 5] = [
        Self::Overdue,
        Self::Upcoming,
        Self::Available,
        Self::Flagged,
        Self::Today,
    ];

    /// Parse a caller-supplied mode name. Unknown names return `None`,
    /// which passes the base filter through unchanged.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "overdue" => Some(Self::Overdue),
            "upcoming" => Some(Self::Upcoming),
            "available" => Some(Self::Available),
            "flagged" => Some(Self::Flagged),
            "today" => Some(Self::Today),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
            Self::Available => "available",
            Self::Flagged => "flagged",
            Self::Today => "today",
        }
    }
}

/// Merge a mode's filter fragments over `base` and pick the default sort.
///
/// The mode wins where it and the base constrain the same field. `None`
/// passes the base through untouched with no imposed sort. Day boundaries
/// come from `now` in UTC; callers localize upstream.
pub fn augment(
    mode: Option<QueryMode>,
    now: DateTime<Utc>,
    lookahead_days: i64,
    base: &TaskFilter,
) -> (TaskFilter, Vec<SortSpec>) {
    let Some(mode) = mode else {
        return (base.clone(), Vec::new());
    };

    let mut filter = base.clone();
    let sort = match mode {
        QueryMode::Overdue => {
            filter.completed = Some(false);
            filter.due_before = Some(now);
            filter.due_after = None;
            vec![SortSpec::asc(SortKey::DueDate)]
        }
        QueryMode::Upcoming => {
            filter.completed = Some(false);
            filter.due_after = Some(now);
            filter.due_before = Some(now + Duration::days(lookahead_days));
            vec![SortSpec::asc(SortKey::DueDate)]
        }
        QueryMode::Available => {
            filter.completed = Some(false);
            filter.available = Some(true);
            vec![SortSpec::asc(SortKey::DueDate), SortSpec::asc(SortKey::Name)]
        }
        QueryMode::Flagged => {
            filter.completed = Some(false);
            filter.flagged = Some(true);
            vec![SortSpec::asc(SortKey::DueDate), SortSpec::asc(SortKey::Name)]
        }
        QueryMode::Today => {
            let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
            filter.completed = Some(false);
            filter.due_after = Some(day_start);
            filter.due_before = Some(day_start + Duration::days(1));
            vec![SortSpec::asc(SortKey::DueDate)]
        }
    };
    (filter, sort)
}
