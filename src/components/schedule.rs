//! Schedule ordering & grouping: turn an unordered match collection into a
//! time-grouped render sequence, one header per distinct start time.

use chrono::{DateTime, Local, Utc};
use tourney_api::Match;

#[derive(Debug, Clone)]
pub enum RenderItem {
    /// Group header, e.g. "09:00". Emitted when the formatted start time
    /// changes between consecutive rows.
    TimeHeader(String),
    MatchRow(Match),
}

#[derive(Debug, Clone)]
pub enum Schedule {
    Rows(Vec<RenderItem>),
    /// Matches exist, but none of them has a start time yet.
    NoneScheduled,
    /// The tournament has no matches at all.
    Empty,
}

/// Start times are grouped at time-of-day granularity, in local time.
pub fn format_start_time(start: DateTime<Utc>) -> String {
    start.with_timezone(&Local).format("%H:%M").to_string()
}

/// Build the render sequence for the results page.
///
/// Unscheduled matches (no start time) are excluded entirely. The remainder
/// is stable-sorted on the composite key (start time, court name); matches
/// without a court sort first within their time slot via the empty-string
/// key. Input is never mutated, and malformed records never error.
pub fn build_schedule(matches: &[Match]) -> Schedule {
    if matches.is_empty() {
        return Schedule::Empty;
    }

    let mut scheduled: Vec<&Match> = matches.iter().filter(|m| m.is_scheduled()).collect();
    if scheduled.is_empty() {
        return Schedule::NoneScheduled;
    }
    scheduled.sort_by(|a, b| (a.start_time, a.court_name()).cmp(&(b.start_time, b.court_name())));

    let mut items = Vec::with_capacity(scheduled.len() * 2);
    let mut previous_label: Option<String> = None;
    for game in scheduled {
        let Some(start) = game.start_time else {
            continue;
        };
        let label = format_start_time(start);
        if previous_label.as_deref() != Some(label.as_str()) {
            items.push(RenderItem::TimeHeader(label.clone()));
            previous_label = Some(label);
        }
        items.push(RenderItem::MatchRow(game.clone()));
    }
    Schedule::Rows(items)
}
