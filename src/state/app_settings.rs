const DEFAULT_API_URL: &str = "http://127.0.0.1:8400";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_url: String,
    pub tournament_id: i64,
    /// Refresh the secondary "upcoming matches" feed after writes.
    pub track_upcoming: bool,
}

impl AppSettings {
    /// Log level is handled separately by env_logger via RUST_LOG.
    pub fn load() -> Self {
        let api_url = std::env::var("COURTSIDE_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let tournament_id = std::env::var("COURTSIDE_TOURNAMENT")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1);
        let track_upcoming = std::env::var("COURTSIDE_TRACK_UPCOMING")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { api_url, tournament_id, track_upcoming }
    }
}
