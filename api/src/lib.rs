pub mod client;
pub mod lookups;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

/// Tournament header record. Carries the tournament-wide default match
/// duration and margin (minutes) that per-match overrides fall back to.
#[derive(Debug, Clone, Default)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub duration_minutes: u32,
    pub margin_minutes: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Stage {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub stage_items: Vec<StageItem>,
}

/// One element of a stage: a group, a bracket, a swiss pool, etc.
#[derive(Debug, Clone, Default)]
pub struct StageItem {
    pub id: i64,
    pub name: String,
    pub rounds: Vec<Round>,
}

#[derive(Debug, Clone, Default)]
pub struct Round {
    pub id: i64,
    pub name: String,
    /// Draft rounds are still being laid out; only their matches may be deleted.
    pub is_draft: bool,
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Default)]
pub struct Match {
    pub id: i64,
    pub round_id: i64,
    pub input1: Slot,
    pub input2: Slot,
    /// Committed scores — authoritative once saved through the write API.
    pub score1: u32,
    pub score2: u32,
    /// Tentative scores reported live but not yet committed. Only meaningful
    /// while the committed pair is still (0, 0).
    pub pending_score1: Option<u32>,
    pub pending_score2: Option<u32>,
    pub court: Option<Court>,
    pub official: Option<Official>,
    /// None = unscheduled; such matches never appear in the schedule view.
    pub start_time: Option<DateTime<Utc>>,
    /// Effective duration/margin after applying any per-match override.
    pub duration_minutes: u32,
    pub margin_minutes: u32,
    /// Per-match overrides; None = use the tournament default.
    pub custom_duration_minutes: Option<u32>,
    pub custom_margin_minutes: Option<u32>,
}

impl Match {
    pub fn is_scheduled(&self) -> bool {
        self.start_time.is_some()
    }

    /// Court display name, empty when no court is assigned. Also the
    /// tie-break sort key within a start time.
    pub fn court_name(&self) -> &str {
        self.court.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}

/// Participant slot of a match: either a concrete team, or a placeholder
/// describing where the participant will come from.
#[derive(Debug, Clone, Default)]
pub enum Slot {
    #[default]
    Tbd,
    Team(Team),
    /// Winner of another match, not yet decided.
    MatchWinner { match_id: i64 },
    /// Final rank inside another stage item, e.g. "#2 of Group A".
    StageItemRank { stage_item_id: i64, position: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Court {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Official {
    pub id: i64,
    pub name: String,
}

/// Write request for `update_match`. The backend treats a None override as
/// "revert to the tournament default".
#[derive(Debug, Clone, Serialize)]
pub struct MatchUpdate {
    pub round_id: i64,
    #[serde(rename = "stage_item_input1_score")]
    pub score1: u32,
    #[serde(rename = "stage_item_input2_score")]
    pub score2: u32,
    pub court_id: Option<i64>,
    pub official_id: Option<i64>,
    pub custom_duration_minutes: Option<u32>,
    pub custom_margin_minutes: Option<u32>,
    pub start_time: Option<DateTime<Utc>>,
}

/// One fetch cycle's immutable view of a tournament. The client never mutates
/// this in place; writes go through the API and a fresh snapshot replaces it.
#[derive(Debug, Clone, Default)]
pub struct TournamentSnapshot {
    pub tournament: Tournament,
    pub stages: Vec<Stage>,
    pub courts: Vec<Court>,
    pub officials: Vec<Official>,
}

impl TournamentSnapshot {
    pub fn all_matches(&self) -> impl Iterator<Item = &Match> {
        self.stages
            .iter()
            .flat_map(|s| &s.stage_items)
            .flat_map(|si| &si.rounds)
            .flat_map(|r| &r.matches)
    }

    pub fn find_match(&self, match_id: i64) -> Option<&Match> {
        self.all_matches().find(|m| m.id == match_id)
    }

    pub fn find_round(&self, round_id: i64) -> Option<&Round> {
        self.stages
            .iter()
            .flat_map(|s| &s.stage_items)
            .flat_map(|si| &si.rounds)
            .find(|r| r.id == round_id)
    }

    /// Replace the stage tree with a freshly fetched one, keeping the rest of
    /// the snapshot (courts, officials, defaults change rarely).
    pub fn replace_stages(&mut self, stages: Vec<Stage>) {
        self.stages = stages;
    }
}
