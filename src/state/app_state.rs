use crate::components::schedule::{RenderItem, Schedule, build_schedule};
use chrono::{DateTime, Utc};
use std::fmt;
use tourney_api::lookups::Lookups;
use tourney_api::{Match, MatchUpdate, Stage, TournamentSnapshot};

#[derive(Debug, Default)]
pub struct AppState {
    pub schedule: ScheduleState,
    pub editor: EditorState,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Schedule / results state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScheduleState {
    snapshot: Option<TournamentSnapshot>,
    lookups: Lookups,
    /// Selected row index among the schedule's MatchRow items.
    pub selected: usize,
}

impl ScheduleState {
    /// Store a freshly loaded snapshot and rebuild the lookup tables.
    pub fn load(&mut self, snapshot: TournamentSnapshot) {
        self.lookups = Lookups::from_stages(&snapshot.stages);
        self.snapshot = Some(snapshot);
        self.clamp_selection();
    }

    /// Merge a refreshed stage tree into the current snapshot.
    pub fn replace_stages(&mut self, stages: Vec<Stage>) {
        if let Some(snapshot) = &mut self.snapshot {
            self.lookups = Lookups::from_stages(&stages);
            snapshot.replace_stages(stages);
            self.clamp_selection();
        }
    }

    /// The stale-data policy: until a snapshot exists the dependent view
    /// renders nothing at all.
    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&TournamentSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    /// Recomputed on every render from the current match collection.
    pub fn schedule(&self) -> Option<Schedule> {
        let snapshot = self.snapshot.as_ref()?;
        let matches: Vec<Match> = snapshot.all_matches().cloned().collect();
        Some(build_schedule(&matches))
    }

    fn row_count(&self) -> usize {
        match self.schedule() {
            Some(Schedule::Rows(items)) => items
                .iter()
                .filter(|i| matches!(i, RenderItem::MatchRow(_)))
                .count(),
            _ => 0,
        }
    }

    pub fn selected_match_id(&self) -> Option<i64> {
        match self.schedule()? {
            Schedule::Rows(items) => items
                .into_iter()
                .filter_map(|i| match i {
                    RenderItem::MatchRow(m) => Some(m.id),
                    _ => None,
                })
                .nth(self.selected),
            _ => None,
        }
    }

    pub fn navigate_down(&mut self) {
        let max = self.row_count().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let max = self.row_count().saturating_sub(1);
        if self.selected > max {
            self.selected = max;
        }
    }
}

// ---------------------------------------------------------------------------
// Match editor — explicit finite state: Closed, or Open over one match
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Open(MatchEditor),
}

impl EditorState {
    pub fn open(&mut self, editor: MatchEditor) {
        *self = EditorState::Open(editor);
    }

    /// Closing discards all local form edits; no backend call is made.
    pub fn close(&mut self) {
        *self = EditorState::Closed;
    }

    pub fn editor(&self) -> Option<&MatchEditor> {
        match self {
            EditorState::Open(editor) => Some(editor),
            EditorState::Closed => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut MatchEditor> {
        match self {
            EditorState::Open(editor) => Some(editor),
            EditorState::Closed => None,
        }
    }

    pub fn is_open_for(&self, match_id: i64) -> bool {
        matches!(self, EditorState::Open(e) if e.match_id == match_id)
    }
}

/// A negative value in the named form field. Surfaced inline next to that
/// field; other fields keep validating independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must not be negative", self.field)
    }
}

#[derive(Debug)]
pub struct MatchEditor {
    pub match_id: i64,
    pub round_id: i64,
    /// Deletion is only offered while the parent round is a draft.
    pub round_is_draft: bool,
    pub label1: String,
    pub label2: String,
    pub form: EditForm,
    /// At most one write may be outstanding for this match; the submit
    /// affordance is disabled while this is set.
    pub in_flight: bool,
    pub field_errors: Vec<ValidationError>,
    pub last_error: Option<String>,
}

impl MatchEditor {
    pub fn open(game: &Match, round_is_draft: bool, lookups: &Lookups) -> Self {
        Self {
            match_id: game.id,
            round_id: game.round_id,
            round_is_draft,
            label1: lookups.slot_label(&game.input1),
            label2: lookups.slot_label(&game.input2),
            form: EditForm::from_match(game),
            in_flight: false,
            field_errors: Vec::new(),
            last_error: None,
        }
    }

    /// Validate and build the write request; sets `in_flight` on success.
    /// Returns None while a submission is already outstanding or when
    /// validation fails (in which case the field errors are stored and no
    /// write request exists).
    pub fn begin_submit(&mut self) -> Option<MatchUpdate> {
        if self.in_flight {
            return None;
        }
        match self.form.build_update(self.round_id) {
            Ok(update) => {
                self.field_errors.clear();
                self.last_error = None;
                self.in_flight = true;
                Some(update)
            }
            Err(errors) => {
                self.field_errors = errors;
                None
            }
        }
    }

    /// The reset action: the same submission with both scores pinned to 0,
    /// every other form and toggle value preserved.
    pub fn begin_reset(&mut self) -> Option<MatchUpdate> {
        if self.in_flight {
            return None;
        }
        match self.form.build_reset(self.round_id) {
            Ok(update) => {
                self.field_errors.clear();
                self.last_error = None;
                self.in_flight = true;
                Some(update)
            }
            Err(errors) => {
                self.field_errors = errors;
                None
            }
        }
    }

    pub fn can_delete(&self) -> bool {
        self.round_is_draft && !self.in_flight
    }

    pub fn begin_delete(&mut self) -> bool {
        if !self.can_delete() {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Remote failure: keep the form intact so the user can retry.
    pub fn on_write_failed(&mut self, message: String) {
        self.in_flight = false;
        self.last_error = Some(message);
    }
}

/// Local, mutable copy of a match's editable fields. Integer fields are
/// signed so that invalid user input can exist long enough to be validated.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub score1: i32,
    pub score2: i32,
    pub court_id: Option<i64>,
    pub official_id: Option<i64>,
    pub custom_duration_enabled: bool,
    pub custom_duration_minutes: Option<i32>,
    pub custom_margin_enabled: bool,
    pub custom_margin_minutes: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
}

impl EditForm {
    pub fn from_match(game: &Match) -> Self {
        Self {
            score1: game.score1 as i32,
            score2: game.score2 as i32,
            court_id: game.court.as_ref().map(|c| c.id),
            official_id: game.official.as_ref().map(|o| o.id),
            custom_duration_enabled: game.custom_duration_minutes.is_some(),
            custom_duration_minutes: game.custom_duration_minutes.map(|v| v as i32),
            custom_margin_enabled: game.custom_margin_minutes.is_some(),
            custom_margin_minutes: game.custom_margin_minutes.map(|v| v as i32),
            start_time: game.start_time,
        }
    }

    /// All offending fields at once, so each can be flagged inline.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.score1 < 0 {
            errors.push(ValidationError { field: "score1" });
        }
        if self.score2 < 0 {
            errors.push(ValidationError { field: "score2" });
        }
        if self.custom_duration_minutes.is_some_and(|v| v < 0) {
            errors.push(ValidationError { field: "custom_duration_minutes" });
        }
        if self.custom_margin_minutes.is_some_and(|v| v < 0) {
            errors.push(ValidationError { field: "custom_margin_minutes" });
        }
        errors
    }

    pub fn build_update(&self, round_id: i64) -> Result<MatchUpdate, Vec<ValidationError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.to_update(round_id, self.score1 as u32, self.score2 as u32))
    }

    /// Scores pinned to (0, 0). The pinned scores need no validation, but an
    /// enabled override still does: a negative value is flagged rather than
    /// silently reverting to the tournament default.
    pub fn build_reset(&self, round_id: i64) -> Result<MatchUpdate, Vec<ValidationError>> {
        let errors: Vec<ValidationError> = self
            .validate()
            .into_iter()
            .filter(|e| e.field != "score1" && e.field != "score2")
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.to_update(round_id, 0, 0))
    }

    fn to_update(&self, round_id: i64, score1: u32, score2: u32) -> MatchUpdate {
        MatchUpdate {
            round_id,
            score1,
            score2,
            court_id: self.court_id,
            official_id: self.official_id,
            // A disabled toggle reverts the override to the tournament default.
            custom_duration_minutes: if self.custom_duration_enabled {
                self.custom_duration_minutes
                    .and_then(|v| u32::try_from(v).ok())
            } else {
                None
            },
            custom_margin_minutes: if self.custom_margin_enabled {
                self.custom_margin_minutes
                    .and_then(|v| u32::try_from(v).ok())
            } else {
                None
            },
            start_time: self.start_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tourney_api::{Court, Round, Slot, StageItem, Team, Tournament};

    fn sample_match() -> Match {
        Match {
            id: 1000,
            round_id: 100,
            input1: Slot::Team(Team { id: 1, name: "Dragons".into() }),
            input2: Slot::Team(Team { id: 2, name: "Lions".into() }),
            score1: 2,
            score2: 1,
            court: Some(Court { id: 5, name: "Court A".into() }),
            custom_duration_minutes: Some(45),
            start_time: Some(Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()),
            duration_minutes: 45,
            margin_minutes: 5,
            ..Default::default()
        }
    }

    fn snapshot_with(matches: Vec<Match>) -> TournamentSnapshot {
        TournamentSnapshot {
            tournament: Tournament { id: 1, ..Default::default() },
            stages: vec![tourney_api::Stage {
                id: 1,
                stage_items: vec![StageItem {
                    id: 10,
                    rounds: vec![Round { id: 100, matches, ..Default::default() }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            courts: vec![],
            officials: vec![],
        }
    }

    #[test]
    fn form_initializes_toggles_from_overrides() {
        let form = EditForm::from_match(&sample_match());
        assert!(form.custom_duration_enabled);
        assert_eq!(form.custom_duration_minutes, Some(45));
        assert!(!form.custom_margin_enabled);
        assert_eq!((form.score1, form.score2), (2, 1));
    }

    #[test]
    fn negative_score_yields_field_error_and_no_request() {
        let mut form = EditForm::from_match(&sample_match());
        form.score1 = -1;
        let errors = form.build_update(100).expect_err("should reject");
        assert_eq!(errors, vec![ValidationError { field: "score1" }]);
    }

    #[test]
    fn each_invalid_field_is_reported_independently() {
        let mut form = EditForm::from_match(&sample_match());
        form.score2 = -3;
        form.custom_margin_enabled = true;
        form.custom_margin_minutes = Some(-10);
        let fields: Vec<&str> = form.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["score2", "custom_margin_minutes"]);
    }

    #[test]
    fn disabled_toggle_reverts_override_to_default() {
        let mut form = EditForm::from_match(&sample_match());
        form.custom_duration_enabled = false;
        let update = form.build_update(100).expect("valid form");
        assert_eq!(update.custom_duration_minutes, None);
    }

    #[test]
    fn reset_pins_scores_and_preserves_everything_else() {
        let form = EditForm::from_match(&sample_match());
        let update = form.build_reset(100).expect("valid form");
        assert_eq!((update.score1, update.score2), (0, 0));
        assert_eq!(update.custom_duration_minutes, Some(45));
        assert_eq!(update.court_id, Some(5));
        assert_eq!(update.start_time, form.start_time);
    }

    #[test]
    fn reset_ignores_scores_but_still_checks_overrides() {
        let mut form = EditForm::from_match(&sample_match());
        form.score1 = -7; // pinned to 0 anyway, must not block the reset
        assert!(form.build_reset(100).is_ok());

        form.custom_duration_minutes = Some(-15);
        let errors = form.build_reset(100).expect_err("should reject");
        assert_eq!(errors, vec![ValidationError { field: "custom_duration_minutes" }]);
    }

    #[test]
    fn reset_with_negative_override_stays_local() {
        let lookups = Lookups::from_stages(&[]);
        let mut editor = MatchEditor::open(&sample_match(), false, &lookups);
        editor.form.custom_duration_minutes = Some(-15);
        assert!(editor.begin_reset().is_none());
        assert!(!editor.in_flight);
        assert_eq!(
            editor.field_errors,
            vec![ValidationError { field: "custom_duration_minutes" }]
        );
    }

    #[test]
    fn at_most_one_submission_in_flight() {
        let lookups = Lookups::from_stages(&[]);
        let mut editor = MatchEditor::open(&sample_match(), false, &lookups);
        assert!(editor.begin_submit().is_some());
        assert!(editor.in_flight);
        assert!(editor.begin_submit().is_none());
        assert!(editor.begin_reset().is_none());
    }

    #[test]
    fn write_failure_keeps_form_for_retry() {
        let lookups = Lookups::from_stages(&[]);
        let mut editor = MatchEditor::open(&sample_match(), false, &lookups);
        let before = editor.form.clone();
        editor.begin_submit().expect("first submit");
        editor.on_write_failed("boom".into());
        assert!(!editor.in_flight);
        assert_eq!(editor.form, before);
        assert_eq!(editor.last_error.as_deref(), Some("boom"));
        assert!(editor.begin_submit().is_some(), "retry must be possible");
    }

    #[test]
    fn invalid_submit_does_not_block_the_editor() {
        let lookups = Lookups::from_stages(&[]);
        let mut editor = MatchEditor::open(&sample_match(), false, &lookups);
        editor.form.score1 = -1;
        assert!(editor.begin_submit().is_none());
        assert!(!editor.in_flight);
        assert_eq!(editor.field_errors, vec![ValidationError { field: "score1" }]);
    }

    #[test]
    fn delete_only_offered_for_draft_rounds() {
        let lookups = Lookups::from_stages(&[]);
        let mut editor = MatchEditor::open(&sample_match(), false, &lookups);
        assert!(!editor.begin_delete());
        let mut editor = MatchEditor::open(&sample_match(), true, &lookups);
        assert!(editor.begin_delete());
        assert!(!editor.begin_delete(), "second delete blocked while in flight");
    }

    #[test]
    fn closing_the_editor_discards_edits() {
        let lookups = Lookups::from_stages(&[]);
        let mut state = EditorState::default();
        state.open(MatchEditor::open(&sample_match(), false, &lookups));
        state.editor_mut().unwrap().form.score1 = 99;
        state.close();
        assert!(matches!(state, EditorState::Closed));
        assert!(state.editor().is_none());
    }

    #[test]
    fn schedule_state_renders_nothing_until_loaded() {
        let state = ScheduleState::default();
        assert!(!state.is_loaded());
        assert!(state.schedule().is_none());
        assert!(state.selected_match_id().is_none());
    }

    #[test]
    fn selection_follows_schedule_order() {
        let mut early = sample_match();
        early.id = 1;
        early.start_time = Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap());
        let late = sample_match(); // id 1000, 10:00

        let mut state = ScheduleState::default();
        state.load(snapshot_with(vec![late, early]));
        assert_eq!(state.selected_match_id(), Some(1));
        state.navigate_down();
        assert_eq!(state.selected_match_id(), Some(1000));
        state.navigate_down();
        assert_eq!(state.selected_match_id(), Some(1000), "clamped at last row");
        state.navigate_up();
        assert_eq!(state.selected_match_id(), Some(1));
    }

    #[test]
    fn refresh_clamps_selection_to_new_row_count() {
        let mut state = ScheduleState::default();
        let mut a = sample_match();
        a.id = 1;
        let mut b = sample_match();
        b.id = 2;
        state.load(snapshot_with(vec![a.clone(), b]));
        state.navigate_down();
        assert_eq!(state.selected, 1);
        state.replace_stages(snapshot_with(vec![a]).stages);
        assert_eq!(state.selected, 0);
    }
}
