use crate::wire::{
    Envelope, WireCourt, WireMatch, WireOfficial, WireRound, WireSlot, WireStage, WireStageItem,
    WireTournament,
};
use crate::{
    Court, Match, MatchUpdate, Official, Round, Slot, Stage, StageItem, Team, Tournament,
};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Tournament backend client. The backend owns all business rules (bracket
/// generation, round progression, score validation past "non-negative"); this
/// client only fetches snapshots and issues writes.
#[derive(Debug, Clone)]
pub struct TourneyApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl TourneyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::builder()
                .user_agent("courtside/0.1 (terminal results console)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Fetch the tournament header (name + default duration/margin).
    pub async fn fetch_tournament(&self, tournament_id: i64) -> ApiResult<Tournament> {
        let url = format!("{}/tournaments/{tournament_id}", self.base_url);
        let raw: Envelope<WireTournament> = self.get(&url).await?;
        let entry = raw
            .data
            .ok_or_else(|| ApiError::NotFound(format!("tournament {tournament_id}")))?;
        Ok(map_tournament(entry))
    }

    /// Fetch the full stage tree: stages → stage items → rounds → matches.
    /// This is the primary live data source for the schedule view.
    pub async fn fetch_stages(&self, tournament_id: i64) -> ApiResult<Vec<Stage>> {
        let url = format!("{}/tournaments/{tournament_id}/stages", self.base_url);
        let raw: Envelope<Vec<WireStage>> = self.get(&url).await?;
        Ok(raw.data.unwrap_or_default().iter().map(map_stage).collect())
    }

    pub async fn fetch_courts(&self, tournament_id: i64) -> ApiResult<Vec<Court>> {
        let url = format!("{}/tournaments/{tournament_id}/courts", self.base_url);
        let raw: Envelope<Vec<WireCourt>> = self.get(&url).await?;
        Ok(raw.data.unwrap_or_default().iter().map(map_court).collect())
    }

    pub async fn fetch_officials(&self, tournament_id: i64) -> ApiResult<Vec<Official>> {
        let url = format!("{}/tournaments/{tournament_id}/officials", self.base_url);
        let raw: Envelope<Vec<WireOfficial>> = self.get(&url).await?;
        Ok(raw
            .data
            .unwrap_or_default()
            .iter()
            .map(map_official)
            .collect())
    }

    /// Secondary live data source: the flat "upcoming matches" feed. Refreshed
    /// after every write alongside the stage tree when the caller tracks it.
    pub async fn fetch_upcoming_matches(&self, tournament_id: i64) -> ApiResult<Vec<Match>> {
        let url = format!(
            "{}/tournaments/{tournament_id}/upcoming_matches",
            self.base_url
        );
        let raw: Envelope<Vec<WireMatch>> = self.get(&url).await?;
        Ok(raw.data.unwrap_or_default().iter().map(map_match).collect())
    }

    /// Commit a match edit. The returned record reflects the write, but callers
    /// must still refresh their live data sources before the edit is settled.
    pub async fn update_match(
        &self,
        tournament_id: i64,
        match_id: i64,
        update: &MatchUpdate,
    ) -> ApiResult<Match> {
        let url = format!(
            "{}/tournaments/{tournament_id}/matches/{match_id}",
            self.base_url
        );
        let response = self
            .client
            .put(&url)
            .timeout(self.timeout)
            .json(update)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.clone()))?;

        let raw: Envelope<WireMatch> = response
            .json()
            .await
            .map_err(|e| ApiError::Parsing(e, url))?;
        let entry = raw
            .data
            .ok_or_else(|| ApiError::NotFound(format!("match {match_id}")))?;
        Ok(map_match(&entry))
    }

    /// Remove a match. Only valid while its parent round is in draft state;
    /// the backend rejects the call otherwise.
    pub async fn delete_match(&self, tournament_id: i64, match_id: i64) -> ApiResult<()> {
        let url = format!(
            "{}/tournaments/{tournament_id}/matches/{match_id}",
            self.base_url
        );
        self.client
            .delete(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url))?;
        Ok(())
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: backend wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_tournament(raw: WireTournament) -> Tournament {
    Tournament {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        duration_minutes: raw.duration_minutes.unwrap_or_default(),
        margin_minutes: raw.margin_minutes.unwrap_or_default(),
    }
}

fn map_stage(raw: &WireStage) -> Stage {
    Stage {
        id: raw.id.unwrap_or_default(),
        name: raw.name.clone().unwrap_or_default(),
        is_active: raw.is_active.unwrap_or_default(),
        stage_items: raw
            .stage_items
            .iter()
            .flatten()
            .map(map_stage_item)
            .collect(),
    }
}

fn map_stage_item(raw: &WireStageItem) -> StageItem {
    StageItem {
        id: raw.id.unwrap_or_default(),
        name: raw.name.clone().unwrap_or_default(),
        rounds: raw.rounds.iter().flatten().map(map_round).collect(),
    }
}

fn map_round(raw: &WireRound) -> Round {
    Round {
        id: raw.id.unwrap_or_default(),
        name: raw.name.clone().unwrap_or_default(),
        is_draft: raw.is_draft.unwrap_or_default(),
        matches: raw.matches.iter().flatten().map(map_match).collect(),
    }
}

fn map_match(raw: &WireMatch) -> Match {
    Match {
        id: raw.id.unwrap_or_default(),
        round_id: raw.round_id.unwrap_or_default(),
        input1: map_slot(raw.stage_item_input1.as_ref()),
        input2: map_slot(raw.stage_item_input2.as_ref()),
        score1: raw.stage_item_input1_score.unwrap_or_default(),
        score2: raw.stage_item_input2_score.unwrap_or_default(),
        pending_score1: raw.pending_score1,
        pending_score2: raw.pending_score2,
        court: raw.court.as_ref().map(map_court),
        official: raw.official.as_ref().map(map_official),
        start_time: raw.start_time.as_deref().and_then(parse_start_time),
        duration_minutes: raw.duration_minutes.unwrap_or_default(),
        margin_minutes: raw.margin_minutes.unwrap_or_default(),
        custom_duration_minutes: raw.custom_duration_minutes,
        custom_margin_minutes: raw.custom_margin_minutes,
    }
}

/// Slot provenance precedence: concrete team, then match winner, then stage
/// item rank. A slot with none of them set is TBD.
fn map_slot(raw: Option<&WireSlot>) -> Slot {
    let Some(raw) = raw else {
        return Slot::Tbd;
    };
    if let Some(team) = &raw.team {
        return Slot::Team(Team {
            id: team.id.unwrap_or_default(),
            name: team.name.clone().unwrap_or_default(),
        });
    }
    if let Some(match_id) = raw.winner_from_match_id {
        return Slot::MatchWinner { match_id };
    }
    if let Some(stage_item_id) = raw.winner_from_stage_item_id {
        return Slot::StageItemRank {
            stage_item_id,
            position: raw.winner_position.unwrap_or(1),
        };
    }
    Slot::Tbd
}

fn map_court(raw: &WireCourt) -> Court {
    Court {
        id: raw.id.unwrap_or_default(),
        name: raw.name.clone().unwrap_or_default(),
    }
}

fn map_official(raw: &WireOfficial) -> Official {
    Official {
        id: raw.id.unwrap_or_default(),
        name: raw.name.clone().unwrap_or_default(),
    }
}

fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WireTeam;

    #[test]
    fn slot_with_team_maps_to_team_variant() {
        let raw = WireSlot {
            team: Some(WireTeam { id: Some(7), name: Some("Dragons".into()) }),
            ..Default::default()
        };
        match map_slot(Some(&raw)) {
            Slot::Team(team) => {
                assert_eq!(team.id, 7);
                assert_eq!(team.name, "Dragons");
            }
            other => panic!("expected Team slot, got {other:?}"),
        }
    }

    #[test]
    fn slot_with_match_winner_maps_to_placeholder() {
        let raw = WireSlot { winner_from_match_id: Some(42), ..Default::default() };
        match map_slot(Some(&raw)) {
            Slot::MatchWinner { match_id } => assert_eq!(match_id, 42),
            other => panic!("expected MatchWinner slot, got {other:?}"),
        }
    }

    #[test]
    fn slot_with_stage_item_rank_defaults_position_to_one() {
        let raw = WireSlot { winner_from_stage_item_id: Some(3), ..Default::default() };
        match map_slot(Some(&raw)) {
            Slot::StageItemRank { stage_item_id, position } => {
                assert_eq!(stage_item_id, 3);
                assert_eq!(position, 1);
            }
            other => panic!("expected StageItemRank slot, got {other:?}"),
        }
    }

    #[test]
    fn empty_slot_is_tbd() {
        assert!(matches!(map_slot(None), Slot::Tbd));
        assert!(matches!(map_slot(Some(&WireSlot::default())), Slot::Tbd));
    }

    #[test]
    fn match_with_missing_scores_defaults_to_zero_zero() {
        let game = map_match(&WireMatch { id: Some(1), ..Default::default() });
        assert_eq!((game.score1, game.score2), (0, 0));
        assert_eq!(game.pending_score1, None);
        assert!(game.start_time.is_none());
        assert!(game.court.is_none());
    }

    #[test]
    fn start_time_parses_rfc3339_with_offset() {
        let dt = parse_start_time("2026-03-14T10:00:00+02:00").expect("should parse");
        assert_eq!(dt.to_rfc3339(), "2026-03-14T08:00:00+00:00");
        assert!(parse_start_time("not a date").is_none());
    }

    // -----------------------------------------------------------------------
    // HTTP behavior against a mock server
    // -----------------------------------------------------------------------

    const STAGES_JSON: &str = r#"{
        "data": [
            {
                "id": 1,
                "name": "Group stage",
                "is_active": true,
                "stage_items": [
                    {
                        "id": 10,
                        "name": "Group A",
                        "rounds": [
                            {
                                "id": 100,
                                "name": "Round 1",
                                "is_draft": false,
                                "matches": [
                                    {
                                        "id": 1000,
                                        "round_id": 100,
                                        "stage_item_input1": {"team": {"id": 7, "name": "Dragons"}},
                                        "stage_item_input2": {"winner_from_match_id": 999},
                                        "stage_item_input1_score": 0,
                                        "stage_item_input2_score": 0,
                                        "pending_score1": 3,
                                        "pending_score2": 1,
                                        "court": {"id": 5, "name": "Court A"},
                                        "start_time": "2026-03-14T10:00:00+00:00",
                                        "duration_minutes": 30,
                                        "margin_minutes": 5,
                                        "custom_duration_minutes": null,
                                        "custom_margin_minutes": null
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[tokio::test]
    async fn fetch_stages_maps_full_tree() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tournaments/1/stages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(STAGES_JSON)
            .create_async()
            .await;

        let api = TourneyApi::new(server.url());
        let stages = api.fetch_stages(1).await.expect("fetch should succeed");
        mock.assert_async().await;

        assert_eq!(stages.len(), 1);
        let game = &stages[0].stage_items[0].rounds[0].matches[0];
        assert_eq!(game.id, 1000);
        assert_eq!((game.pending_score1, game.pending_score2), (Some(3), Some(1)));
        assert_eq!(game.court_name(), "Court A");
        assert!(matches!(game.input2, Slot::MatchWinner { match_id: 999 }));
    }

    #[tokio::test]
    async fn update_match_puts_payload_and_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/tournaments/1/matches/1000")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "round_id": 100,
                "stage_item_input1_score": 2,
                "stage_item_input2_score": 1,
                "court_id": 5,
                "official_id": null,
                "custom_duration_minutes": null,
                "custom_margin_minutes": null,
                "start_time": null
            })))
            .with_status(200)
            .with_body(
                r#"{"data": {"id": 1000, "round_id": 100,
                    "stage_item_input1_score": 2, "stage_item_input2_score": 1}}"#,
            )
            .create_async()
            .await;

        let api = TourneyApi::new(server.url());
        let update = MatchUpdate {
            round_id: 100,
            score1: 2,
            score2: 1,
            court_id: Some(5),
            official_id: None,
            custom_duration_minutes: None,
            custom_margin_minutes: None,
            start_time: None,
        };
        let game = api
            .update_match(1, 1000, &update)
            .await
            .expect("update should succeed");
        mock.assert_async().await;
        assert_eq!((game.score1, game.score2), (2, 1));
    }

    #[tokio::test]
    async fn delete_match_hits_delete_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/tournaments/1/matches/1000")
            .with_status(204)
            .create_async()
            .await;

        let api = TourneyApi::new(server.url());
        api.delete_match(1, 1000).await.expect("delete should succeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_surfaces_as_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tournaments/1/stages")
            .with_status(500)
            .create_async()
            .await;

        let api = TourneyApi::new(server.url());
        let err = api.fetch_stages(1).await.expect_err("should fail");
        assert!(matches!(err, ApiError::Api(_, _)), "got {err}");
    }
}
