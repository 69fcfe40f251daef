use crate::playback::Snapshot;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, LineupsState};
use log::info;
use matchcast_api::{Lineups, MatchResult};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Warmup,
    Live,
    Summary,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings, match_id: String) -> Self {
        let app = Self {
            state: AppState::new(match_id),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Worker responses, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_match_loaded(&mut self, result: MatchResult) {
        self.state.last_error = None;
        info!("loaded {} v {}", result.home.name, result.away.name);
        self.state.warmup.result = Some(result);
    }

    pub fn on_lineups_loaded(&mut self, lineups: Lineups) {
        self.state.warmup.lineups = LineupsState::Loaded(lineups);
    }

    pub fn on_lineups_unavailable(&mut self, message: String) {
        self.state.warmup.lineups = LineupsState::Unavailable(message);
    }

    pub fn on_snapshot(&mut self, snapshot: Snapshot) {
        let summary_ready = snapshot.summary_ready;
        self.state.live.apply(snapshot);
        if summary_ready && self.state.active_tab == MenuItem::Live {
            self.update_tab(MenuItem::Summary);
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Playback control
    // -----------------------------------------------------------------------

    /// The match to hand to the playback driver, if one is loaded. Switches
    /// to the live view as a side-effect.
    pub fn begin_playback(&mut self) -> Option<MatchResult> {
        let Some(result) = self.state.warmup.result.clone() else {
            self.state.last_error = Some("Match not loaded yet".to_string());
            return None;
        };
        self.state.live.reset();
        self.update_tab(MenuItem::Live);
        Some(result)
    }

    pub fn is_playing(&self) -> bool {
        self.state.live.started && !self.state.live.snapshot.terminal
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if self.state.active_tab == MenuItem::Summary {
            self.state.live.scroll_offset = 0;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
