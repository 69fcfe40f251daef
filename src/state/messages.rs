use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use matchcast_api::{Lineups, MatchResult};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadMatch { match_id: String },
    LoadLineups { match_id: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    MatchLoaded { result: Box<MatchResult> },
    LineupsLoaded { lineups: Lineups },
    /// Lineups are optional; the warm-up view says so instead of failing.
    LineupsUnavailable { message: String },
    Error { message: String },
}

#[derive(Debug)]
pub enum PlaybackCommand {
    Start(Box<MatchResult>),
    Stop,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
