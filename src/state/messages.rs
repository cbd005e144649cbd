use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use tourney_api::{MatchUpdate, Stage, TournamentSnapshot};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Full load: tournament header, stages, courts, officials.
    LoadTournament,
    /// Re-fetch the stage tree only; the rest of the snapshot rarely changes.
    RefreshMatches,
    SubmitEdit { match_id: i64, update: MatchUpdate },
    DeleteMatch { match_id: i64 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    TournamentLoaded { snapshot: TournamentSnapshot },
    MatchesRefreshed { stages: Vec<Stage> },
    /// A write (update or delete) committed and the dependent live sources
    /// were refreshed in sequence. A refresh failure never rolls the write
    /// back; it leaves `stages` empty and is surfaced as a warning instead.
    EditSettled {
        match_id: i64,
        stages: Option<Vec<Stage>>,
        refresh_warning: Option<String>,
    },
    MatchDeleted {
        match_id: i64,
        stages: Option<Vec<Stage>>,
        refresh_warning: Option<String>,
    },
    /// A write (update or delete) for the named match failed before it could
    /// commit. Kept separate from `Error` so only genuine write failures
    /// release that match's editor for a retry.
    WriteFailed { match_id: i64, message: String },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
