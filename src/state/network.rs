use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tourney_api::client::{ApiError, TourneyApi};
use tourney_api::{MatchUpdate, Stage, TournamentSnapshot};

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: TourneyApi,
    tournament_id: i64,
    /// Whether an "upcoming matches" view depends on this tournament's data.
    /// When set, it is refreshed as the secondary source after every write.
    track_upcoming: bool,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: TourneyApi,
        tournament_id: i64,
        track_upcoming: bool,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            tournament_id,
            track_upcoming,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            // A failed write must release exactly one editor, so its error
            // response keeps the match id; read errors stay anonymous.
            let write_target = match &request {
                NetworkRequest::SubmitEdit { match_id, .. }
                | NetworkRequest::DeleteMatch { match_id } => Some(*match_id),
                _ => None,
            };

            let result = match request {
                NetworkRequest::LoadTournament => self.handle_load_tournament().await,
                NetworkRequest::RefreshMatches => self.handle_refresh_matches().await,
                NetworkRequest::SubmitEdit { match_id, update } => {
                    self.handle_submit_edit(match_id, update).await
                }
                NetworkRequest::DeleteMatch { match_id } => {
                    self.handle_delete_match(match_id).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| match write_target {
                Some(match_id) => NetworkResponse::WriteFailed {
                    match_id,
                    message: err.to_string(),
                },
                None => NetworkResponse::Error { message: err.to_string() },
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_tournament(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading tournament {}", self.tournament_id);
        let tournament = self.client.fetch_tournament(self.tournament_id).await?;
        let stages = self.client.fetch_stages(self.tournament_id).await?;
        let courts = self.client.fetch_courts(self.tournament_id).await?;
        let officials = self.client.fetch_officials(self.tournament_id).await?;
        Ok(NetworkResponse::TournamentLoaded {
            snapshot: TournamentSnapshot { tournament, stages, courts, officials },
        })
    }

    async fn handle_refresh_matches(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing match data");
        let stages = self.client.fetch_stages(self.tournament_id).await?;
        Ok(NetworkResponse::MatchesRefreshed { stages })
    }

    async fn handle_submit_edit(
        &self,
        match_id: i64,
        update: MatchUpdate,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("updating match {match_id}");
        self.client
            .update_match(self.tournament_id, match_id, &update)
            .await?;
        let (stages, refresh_warning) = self.refresh_after_write().await;
        Ok(NetworkResponse::EditSettled { match_id, stages, refresh_warning })
    }

    async fn handle_delete_match(&self, match_id: i64) -> Result<NetworkResponse, ApiError> {
        debug!("deleting match {match_id}");
        self.client.delete_match(self.tournament_id, match_id).await?;
        let (stages, refresh_warning) = self.refresh_after_write().await;
        Ok(NetworkResponse::MatchDeleted { match_id, stages, refresh_warning })
    }

    /// Sequential dual refresh after a committed write: the stage tree first,
    /// then the upcoming-matches feed when tracked. The write itself is
    /// already settled server-side, so a refresh failure only produces a
    /// warning; it never becomes an error response.
    async fn refresh_after_write(&self) -> (Option<Vec<Stage>>, Option<String>) {
        let mut warning = None;

        let stages = match self.client.fetch_stages(self.tournament_id).await {
            Ok(stages) => Some(stages),
            Err(e) => {
                warn!("post-write stage refresh failed: {e}");
                warning = Some(format!("schedule refresh failed: {e}"));
                None
            }
        };

        if self.track_upcoming {
            if let Err(e) = self.client.fetch_upcoming_matches(self.tournament_id).await {
                warn!("post-write upcoming refresh failed: {e}");
                warning.get_or_insert_with(|| format!("upcoming matches refresh failed: {e}"));
            }
        }

        (stages, warning)
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
