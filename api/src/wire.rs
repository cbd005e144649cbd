/// Backend API raw wire types — serde shapes for deserializing responses.
/// These map to our clean domain types via the map_* functions in client.rs.
use serde::Deserialize;

/// Every collection endpoint wraps its payload as `{"data": ...}`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

// ---------------------------------------------------------------------------
// Tournament  (GET /tournaments/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTournament {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub margin_minutes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Stage tree  (GET /tournaments/{id}/stages)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStage {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub stage_items: Option<Vec<WireStageItem>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStageItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub rounds: Option<Vec<WireRound>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireRound {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub is_draft: Option<bool>,
    pub matches: Option<Vec<WireMatch>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireMatch {
    pub id: Option<i64>,
    pub round_id: Option<i64>,
    pub stage_item_input1: Option<WireSlot>,
    pub stage_item_input2: Option<WireSlot>,
    pub stage_item_input1_score: Option<u32>,
    pub stage_item_input2_score: Option<u32>,
    pub pending_score1: Option<u32>,
    pub pending_score2: Option<u32>,
    pub court: Option<WireCourt>,
    pub official: Option<WireOfficial>,
    pub start_time: Option<String>, // ISO 8601
    pub duration_minutes: Option<u32>,
    pub margin_minutes: Option<u32>,
    pub custom_duration_minutes: Option<u32>,
    pub custom_margin_minutes: Option<u32>,
}

/// Slot provenance: exactly one of `team`, `winner_from_match_id`, or the
/// `winner_from_stage_item_id` + `winner_position` pair is populated.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireSlot {
    pub team: Option<WireTeam>,
    pub winner_from_match_id: Option<i64>,
    pub winner_from_stage_item_id: Option<i64>,
    pub winner_position: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeam {
    pub id: Option<i64>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Courts & officials  (GET /tournaments/{id}/courts, .../officials)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireCourt {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireOfficial {
    pub id: Option<i64>,
    pub name: Option<String>,
}
