use crate::playback::clock::{ClockPhase, ClockState};
use crate::playback::momentum::Momentum;
use crate::playback::timers::{TimerAction, TimerHandle, TimerQueue};
use crate::playback::var::VarSession;
use matchcast_api::Side;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub home: u16,
    pub away: u16,
}

impl Score {
    pub fn credit(&mut self, side: Side) {
        match side {
            Side::Home => self.home += 1,
            Side::Away => self.away += 1,
            Side::None => {}
        }
    }

    /// Take a goal back; never drops below zero.
    pub fn revoke(&mut self, side: Side) {
        match side {
            Side::Home => self.home = self.home.saturating_sub(1),
            Side::Away => self.away = self.away.saturating_sub(1),
            Side::None => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerTone {
    Goal,
    Alert,
    Card,
    Var,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub text: String,
    pub tone: BannerTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub label: String,
    pub text: String,
}

impl FeedEntry {
    pub fn render(&self) -> String {
        format!("{}' {}", self.label, self.text)
    }
}

/// State handed to the presentation layer after every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub clock_label: String,
    pub phase: ClockPhase,
    pub var_active: bool,
    pub live_score: Score,
    pub momentum: Momentum,
    /// Most recent first.
    pub event_feed: Vec<String>,
    pub banner: Option<Banner>,
    pub terminal: bool,
    pub summary_ready: bool,
}

/// All mutable state of one playback. Only the controller mutates it.
#[derive(Debug, Default)]
pub struct PlaybackSession {
    pub clock: ClockState,
    /// `minute|kind|text` keys of every dispatched event.
    pub seen_event_ids: HashSet<String>,
    pub live_score: Score,
    pub momentum: Momentum,
    pub var_session: Option<VarSession>,
    pub pending_timers: TimerQueue,
    pub feed: Vec<FeedEntry>,
    pub banner: Option<Banner>,
    pub terminal: bool,
    pub summary_ready: bool,
    pub stopped: bool,
    /// Session time: the sum of every tick period so far.
    pub elapsed_ms: u64,
    banner_timer: Option<TimerHandle>,
}

impl PlaybackSession {
    pub fn schedule(&mut self, delay_ms: u64, action: TimerAction) -> TimerHandle {
        self.pending_timers.schedule(self.elapsed_ms, delay_ms, action)
    }

    /// Replace the banner. With a ttl it clears itself; without one it stays
    /// until replaced or cleared.
    pub fn show_banner(&mut self, text: impl Into<String>, tone: BannerTone, ttl_ms: Option<u64>) {
        if let Some(previous) = self.banner_timer.take() {
            self.pending_timers.cancel(previous);
        }
        self.banner = Some(Banner { text: text.into(), tone });
        let timer = ttl_ms.map(|ttl| self.schedule(ttl, TimerAction::ClearBanner));
        self.banner_timer = timer;
    }

    pub fn clear_banner(&mut self) {
        if let Some(previous) = self.banner_timer.take() {
            self.pending_timers.cancel(previous);
        }
        self.banner = None;
    }

    /// A `ClearBanner` timer came due.
    pub fn expire_banner(&mut self, handle: TimerHandle) {
        if self.banner_timer == Some(handle) {
            self.banner_timer = None;
            self.banner = None;
        }
    }

    /// Drop every pending timer, including the banner's.
    pub fn cancel_timers(&mut self) -> usize {
        self.banner_timer = None;
        self.pending_timers.cancel_all()
    }

    pub fn push_feed(&mut self, label: String, text: impl Into<String>) {
        self.feed.push(FeedEntry { label, text: text.into() });
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            clock_label: self.clock.display_label.clone(),
            phase: self.clock.phase,
            var_active: self.var_session.is_some(),
            live_score: self.live_score,
            momentum: self.momentum,
            event_feed: self.feed.iter().rev().map(FeedEntry::render).collect(),
            banner: self.banner.clone(),
            terminal: self.terminal,
            summary_ready: self.summary_ready,
        }
    }
}
