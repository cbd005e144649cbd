use crate::app::App;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let editor_open = guard.state.editor.editor().is_some();

    match (editor_open, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Editor: Esc discards local edits, Enter saves, z resets the scores,
        // d removes the match (draft rounds only).
        (true, KeyCode::Esc, _) => guard.close_editor(),
        (true, KeyCode::Enter, _) => {
            if let Some(request) = guard.submit_editor() {
                drop(guard);
                let _ = network_requests.send(request).await;
            }
        }
        (true, Char('z'), _) => {
            if let Some(request) = guard.reset_editor_scores() {
                drop(guard);
                let _ = network_requests.send(request).await;
            }
        }
        (true, Char('d'), _) => {
            if let Some(request) = guard.delete_editor_match() {
                drop(guard);
                let _ = network_requests.send(request).await;
            }
        }

        // Schedule navigation
        (false, Char('j') | KeyCode::Down, _) => guard.schedule_down(),
        (false, Char('k') | KeyCode::Up, _) => guard.schedule_up(),
        (false, KeyCode::Enter, _) => {
            guard.open_editor();
        }
        (false, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::RefreshMatches).await;
        }

        _ => {}
    }
}
