use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, MatchEditor};
use crate::state::messages::NetworkRequest;
use tourney_api::{Stage, TournamentSnapshot};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self { settings: AppSettings::load(), state: AppState::new() }
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_tournament_loaded(&mut self, snapshot: TournamentSnapshot) {
        self.state.last_error = None;
        self.state.schedule.load(snapshot);
    }

    pub fn on_matches_refreshed(&mut self, stages: Vec<Stage>) {
        self.state.schedule.replace_stages(stages);
    }

    /// A write committed and the dependent sources were refreshed. The editor
    /// for that match (if still open) closes; a refresh warning is shown but
    /// the write stands.
    pub fn on_edit_settled(
        &mut self,
        match_id: i64,
        stages: Option<Vec<Stage>>,
        refresh_warning: Option<String>,
    ) {
        if let Some(stages) = stages {
            self.state.schedule.replace_stages(stages);
        }
        self.state.last_error = refresh_warning;
        if self.state.editor.is_open_for(match_id) {
            self.state.editor.close();
        }
    }

    pub fn on_match_deleted(
        &mut self,
        match_id: i64,
        stages: Option<Vec<Stage>>,
        refresh_warning: Option<String>,
    ) {
        self.on_edit_settled(match_id, stages, refresh_warning);
    }

    /// A write for this match failed: the editor (if still open on it with a
    /// submission outstanding) keeps its form intact and is released for a
    /// retry. Failures for other matches fall through to the footer.
    pub fn on_write_failed(&mut self, match_id: i64, message: String) {
        if self.state.editor.is_open_for(match_id)
            && let Some(editor) = self.state.editor.editor_mut()
            && editor.in_flight
        {
            editor.on_write_failed(message);
            return;
        }
        self.state.last_error = Some(message);
    }

    /// Read errors (load, periodic refresh) never touch the editor; an
    /// outstanding submission stays outstanding until its own response lands.
    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Schedule navigation — delegated to ScheduleState
    // -----------------------------------------------------------------------

    pub fn schedule_down(&mut self) {
        self.state.schedule.navigate_down();
    }

    pub fn schedule_up(&mut self) {
        self.state.schedule.navigate_up();
    }

    // -----------------------------------------------------------------------
    // Editor transitions
    // -----------------------------------------------------------------------

    /// Open the editor over the currently selected match. Opening requires a
    /// selected, still-present match; otherwise the editor stays closed.
    pub fn open_editor(&mut self) -> bool {
        let Some(match_id) = self.state.schedule.selected_match_id() else {
            return false;
        };
        let Some(snapshot) = self.state.schedule.snapshot() else {
            return false;
        };
        let Some(game) = snapshot.find_match(match_id) else {
            return false;
        };
        let round_is_draft = snapshot
            .find_round(game.round_id)
            .map(|r| r.is_draft)
            .unwrap_or(false);
        let editor = MatchEditor::open(game, round_is_draft, self.state.schedule.lookups());
        self.state.editor.open(editor);
        true
    }

    pub fn close_editor(&mut self) {
        self.state.editor.close();
    }

    /// Save the editor form. None when the editor is closed, a submission is
    /// already in flight, or validation failed (errors stay on the editor).
    pub fn submit_editor(&mut self) -> Option<NetworkRequest> {
        let editor = self.state.editor.editor_mut()?;
        let update = editor.begin_submit()?;
        Some(NetworkRequest::SubmitEdit { match_id: editor.match_id, update })
    }

    /// The reset-scores action: same write path with scores pinned to (0, 0).
    pub fn reset_editor_scores(&mut self) -> Option<NetworkRequest> {
        let editor = self.state.editor.editor_mut()?;
        let update = editor.begin_reset()?;
        Some(NetworkRequest::SubmitEdit { match_id: editor.match_id, update })
    }

    pub fn delete_editor_match(&mut self) -> Option<NetworkRequest> {
        let editor = self.state.editor.editor_mut()?;
        if !editor.begin_delete() {
            return None;
        }
        Some(NetworkRequest::DeleteMatch { match_id: editor.match_id })
    }
}
