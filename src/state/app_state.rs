use crate::app::MenuItem;
use crate::playback::Snapshot;
use matchcast_api::{Lineups, MatchResult};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Warm-up state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub enum LineupsState {
    #[default]
    Pending,
    Loaded(Lineups),
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct WarmupState {
    pub match_id: String,
    pub result: Option<MatchResult>,
    pub lineups: LineupsState,
}

// ---------------------------------------------------------------------------
// Live view state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedLine {
    pub text: String,
    pub is_new: bool,
}

#[derive(Debug, Default)]
pub struct LiveState {
    pub started: bool,
    pub snapshot: Snapshot,
    /// Most recent first, like the snapshot feed.
    pub feed: Vec<FeedLine>,
    pub scroll_offset: u16,
}

impl LiveState {
    pub fn reset(&mut self) {
        *self = Self { started: true, ..Self::default() };
    }

    /// Take a new snapshot; lines absent from the previous one are marked new.
    pub fn apply(&mut self, snapshot: Snapshot) {
        let previous: HashSet<&str> = self.feed.iter().map(|l| l.text.as_str()).collect();
        let feed = snapshot
            .event_feed
            .iter()
            .map(|text| FeedLine {
                text: text.clone(),
                is_new: !previous.contains(text.as_str()),
            })
            .collect();
        self.feed = feed;
        self.snapshot = snapshot;
    }

    pub fn scroll_down(&mut self) {
        let max = self.feed.len().saturating_sub(1) as u16;
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub warmup: WarmupState,
    pub live: LiveState,
}

impl AppState {
    pub fn new(match_id: String) -> Self {
        Self {
            warmup: WarmupState { match_id, ..WarmupState::default() },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(feed: &[&str]) -> Snapshot {
        Snapshot {
            event_feed: feed.iter().map(|s| s.to_string()).collect(),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_new_feed_lines_are_highlighted_once() {
        let mut live = LiveState::default();
        live.apply(snapshot(&["17' GOAL! Lautaro"]));
        assert!(live.feed[0].is_new);

        live.apply(snapshot(&["31' Penalty to Lazio", "17' GOAL! Lautaro"]));
        assert!(live.feed[0].is_new);
        assert!(!live.feed[1].is_new);

        live.apply(snapshot(&["31' Penalty to Lazio", "17' GOAL! Lautaro"]));
        assert!(live.feed.iter().all(|l| !l.is_new));
    }

    #[test]
    fn test_scroll_is_bounded_by_feed() {
        let mut live = LiveState::default();
        live.apply(snapshot(&["2' b", "1' a"]));
        for _ in 0..5 {
            live.scroll_down();
        }
        assert_eq!(live.scroll_offset, 1);
        live.scroll_up();
        live.scroll_up();
        assert_eq!(live.scroll_offset, 0);
    }
}
