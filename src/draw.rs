use crate::app::App;
use crate::components::schedule::{RenderItem, Schedule, format_start_time};
use crate::components::scoreboard::{OutcomeColor, classify_outcome, resolve_display};
use crate::state::app_state::MatchEditor;
use crate::state::network::LoadingState;
use crossterm::style::{Color, Stylize};
use crossterm::{cursor, execute, terminal};
use std::io::{self, Write};
use tourney_api::Match;

// Score chip palette, matching the web results page.
const PENDING: Color = Color::Rgb { r: 0x88, g: 0x88, b: 0x88 };
const WIN: Color = Color::Rgb { r: 0x2a, g: 0x8f, b: 0x37 };
const DRAW: Color = Color::Rgb { r: 0x65, g: 0x65, b: 0x65 };
const LOSS: Color = Color::Rgb { r: 0xaf, g: 0x40, b: 0x34 };

fn outcome_color(outcome: OutcomeColor) -> Color {
    match outcome {
        OutcomeColor::Pending => PENDING,
        OutcomeColor::Win => WIN,
        OutcomeColor::Draw => DRAW,
        OutcomeColor::Loss => LOSS,
    }
}

pub fn draw(app: &App, loading: LoadingState) {
    let mut out = io::stdout();
    let _ = execute!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All)
    );

    let title = match app.state.schedule.snapshot() {
        Some(snapshot) => format!("{} — results", snapshot.tournament.name),
        None => "courtside".to_owned(),
    };
    line(&mut out, format!("{} {}", title.bold(), loading.spinner_char));
    line(&mut out, String::new());

    // Stale-data policy: nothing below the title until a snapshot exists.
    let Some(schedule) = app.state.schedule.schedule() else {
        let _ = out.flush();
        return;
    };

    match schedule {
        Schedule::Empty => line(&mut out, "No matches in this tournament yet.".dim().to_string()),
        Schedule::NoneScheduled => {
            line(&mut out, "No matches have been scheduled yet.".dim().to_string());
        }
        Schedule::Rows(items) => {
            let mut row_index = 0;
            for item in &items {
                match item {
                    RenderItem::TimeHeader(label) => {
                        line(&mut out, format!("  {}", label.clone().bold().underlined()));
                    }
                    RenderItem::MatchRow(game) => {
                        let selected = row_index == app.state.schedule.selected;
                        line(&mut out, match_line(app, game, selected));
                        row_index += 1;
                    }
                }
            }
        }
    }

    if let Some(editor) = app.state.editor.editor() {
        line(&mut out, String::new());
        draw_editor(&mut out, app, editor);
    } else {
        line(&mut out, String::new());
        line(
            &mut out,
            "[j/k] select  [Enter] edit  [r] refresh  [q] quit".dim().to_string(),
        );
    }

    if let Some(error) = &app.state.last_error {
        line(&mut out, String::new());
        line(&mut out, format!("{}", error.clone().with(LOSS)));
    }

    let _ = out.flush();
}

fn match_line(app: &App, game: &Match, selected: bool) -> String {
    let lookups = app.state.schedule.lookups();
    let display = resolve_display(game);
    let (outcome1, outcome2) = classify_outcome(display.score1, display.score2, display.pending);

    let marker = if selected { ">" } else { " " };
    let chip1 = format!(" {} ", display.score1)
        .with(Color::White)
        .on(outcome_color(outcome1));
    let chip2 = format!(" {} ", display.score2)
        .with(Color::White)
        .on(outcome_color(outcome2));
    let official = game
        .official
        .as_ref()
        .map(|o| format!("  ({})", o.name))
        .unwrap_or_default();

    format!(
        "{marker} {:<10} {} {chip1}–{chip2} {}{official}",
        game.court_name(),
        lookups.slot_label(&game.input1),
        lookups.slot_label(&game.input2),
    )
}

fn draw_editor(out: &mut impl Write, app: &App, editor: &MatchEditor) {
    line(out, format!("── Edit: {} vs {} ──", editor.label1, editor.label2));

    let form = &editor.form;
    line(out, format!("  score1: {:<4} score2: {}", form.score1, form.score2));

    let snapshot = app.state.schedule.snapshot();
    let court = snapshot
        .and_then(|s| s.courts.iter().find(|c| Some(c.id) == form.court_id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "—".to_owned());
    let official = snapshot
        .and_then(|s| s.officials.iter().find(|o| Some(o.id) == form.official_id))
        .map(|o| o.name.clone())
        .unwrap_or_else(|| "—".to_owned());
    line(out, format!("  court: {court}   official: {official}"));

    let start = form
        .start_time
        .map(format_start_time)
        .unwrap_or_else(|| "unscheduled".to_owned());
    line(out, format!("  start time: {start}"));
    line(
        out,
        format!(
            "  duration: {}   margin: {}",
            override_label(form.custom_duration_enabled, form.custom_duration_minutes),
            override_label(form.custom_margin_enabled, form.custom_margin_minutes),
        ),
    );

    for error in &editor.field_errors {
        line(out, format!("  {}", error.to_string().with(LOSS)));
    }
    if let Some(error) = &editor.last_error {
        line(out, format!("  {}", error.clone().with(LOSS)));
    }

    if editor.in_flight {
        line(out, "  saving…".dim().to_string());
    } else {
        let delete_hint = if editor.can_delete() { "  [d] delete" } else { "" };
        line(
            out,
            format!("  [Enter] save  [z] reset scores{delete_hint}  [Esc] cancel")
                .dim()
                .to_string(),
        );
    }
}

fn override_label(enabled: bool, minutes: Option<i32>) -> String {
    match (enabled, minutes) {
        (true, Some(minutes)) => format!("{minutes} min (custom)"),
        _ => "default".to_owned(),
    }
}

// Raw mode needs explicit carriage returns.
fn line(out: &mut impl Write, text: String) {
    let _ = write!(out, "{text}\r\n");
}
