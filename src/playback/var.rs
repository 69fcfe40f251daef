//! Video review episodes.
//!
//! A `VAR_PROCESS` event freezes the clock and walks `Checking → Resolving`
//! before handing play back. The verdict is looked up in the log when the
//! resolve timer fires, never dispatched on its own.

use crate::playback::config::PlaybackConfig;
use crate::playback::dispatcher::team_tag;
use crate::playback::session::{BannerTone, PlaybackSession};
use crate::playback::timers::{TimerAction, TimerHandle};
use log::{debug, info, warn};
use matchcast_api::{EventKind, MatchEvent, MatchResult, Side, VarDecision, VarType};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarStage {
    Checking,
    Resolving,
}

/// The review currently on screen.
#[derive(Debug, Clone)]
pub struct VarSession {
    pub trigger_event: MatchEvent,
    pub var_type: Option<VarType>,
    pub elapsed_check_ticks: u32,
    pub resolved: bool,
    pub stage: VarStage,
    pulse: Option<TimerHandle>,
}

/// How a finished review changed the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarOutcome {
    Confirmed,
    Overturned,
    NoVerdict,
}

#[derive(Debug, Default)]
pub struct VarCoordinator {
    /// Reviews requested while another was running.
    queue: VecDeque<MatchEvent>,
    /// Log indices of verdicts already applied.
    consumed_verdicts: HashSet<usize>,
}

impl VarCoordinator {
    pub fn reset(&mut self) {
        self.queue.clear();
        self.consumed_verdicts.clear();
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Start a review for `trigger`, or queue it behind the active one.
    pub fn request(&mut self, session: &mut PlaybackSession, trigger: MatchEvent, config: &PlaybackConfig) {
        if session.var_session.is_some() {
            info!("VAR review at {}' queued behind the active one", trigger.minute);
            self.queue.push_back(trigger);
            return;
        }
        self.begin(session, trigger, config);
    }

    fn begin(&mut self, session: &mut PlaybackSession, trigger: MatchEvent, config: &PlaybackConfig) {
        info!("VAR review started at {}': {}", trigger.minute, trigger.text);
        session.clock.paused = true;
        session.schedule(config.var_resolve_ms, TimerAction::VarResolve);
        let pulse = (config.var_check_ticks > 0).then(|| session.schedule(config.tick_ms, TimerAction::VarPulse));
        session.var_session = Some(VarSession {
            var_type: trigger.var_type,
            trigger_event: trigger,
            elapsed_check_ticks: 0,
            resolved: false,
            stage: VarStage::Checking,
            pulse,
        });
        session.show_banner(checking_text(0), BannerTone::Var, None);
    }

    /// One beat of the "still checking" sub-ticker.
    pub fn pulse(&mut self, session: &mut PlaybackSession, config: &PlaybackConfig) {
        let Some(var) = session.var_session.as_mut() else {
            return;
        };
        var.pulse = None;
        if var.stage != VarStage::Checking || var.elapsed_check_ticks >= config.var_check_ticks {
            return;
        }
        var.elapsed_check_ticks += 1;
        let ticks = var.elapsed_check_ticks;

        let next = (ticks < config.var_check_ticks).then(|| session.schedule(config.tick_ms, TimerAction::VarPulse));
        if let Some(var) = session.var_session.as_mut() {
            var.pulse = next;
        }
        session.show_banner(checking_text(ticks), BannerTone::Var, None);
    }

    /// Look up the verdict and apply it. Play resumes on `finish`.
    pub fn resolve(&mut self, session: &mut PlaybackSession, result: &MatchResult, config: &PlaybackConfig) -> Option<VarOutcome> {
        let var = session.var_session.as_mut()?;
        if var.resolved {
            return None;
        }
        var.resolved = true;
        var.stage = VarStage::Resolving;
        let pulse = var.pulse.take();
        let trigger = var.trigger_event.clone();
        let var_type = var.var_type;
        if let Some(pulse) = pulse {
            session.pending_timers.cancel(pulse);
        }

        let outcome = match self.find_verdict(result, &trigger, var_type) {
            Some(index) => {
                self.consumed_verdicts.insert(index);
                apply_verdict(session, result, &trigger, &result.events[index])
            }
            None => {
                debug!("no verdict in the log for VAR at {}'", trigger.minute);
                session.show_banner("VAR: CHECK COMPLETED", BannerTone::Var, None);
                VarOutcome::NoVerdict
            }
        };

        session.schedule(config.var_exit_ms, TimerAction::VarExit);
        Some(outcome)
    }

    /// Close the review. The next queued review starts straight away with
    /// the clock still frozen; otherwise play resumes where it stopped.
    pub fn finish(&mut self, session: &mut PlaybackSession, config: &PlaybackConfig) {
        if session.var_session.take().is_none() {
            return;
        }
        session.clear_banner();
        match self.queue.pop_front() {
            Some(next) => self.begin(session, next, config),
            None => session.clock.paused = false,
        }
    }

    /// First unused verdict at or after the trigger with the same review
    /// type and a compatible side.
    fn find_verdict(&self, result: &MatchResult, trigger: &MatchEvent, var_type: Option<VarType>) -> Option<usize> {
        result.events.iter().enumerate().find_map(|(index, event)| {
            let matches = event.kind == EventKind::VarVerdict
                && event.minute >= trigger.minute
                && event.var_type == var_type
                && sides_compatible(event.side, trigger.side)
                && !self.consumed_verdicts.contains(&index);
            matches.then_some(index)
        })
    }
}

fn sides_compatible(a: Side, b: Side) -> bool {
    a == Side::None || b == Side::None || a == b
}

fn checking_text(ticks: u32) -> String {
    let dots = ".".repeat((ticks % 3 + 1) as usize);
    format!("VAR CHECK IN PROGRESS{dots}")
}

fn apply_verdict(
    session: &mut PlaybackSession,
    result: &MatchResult,
    trigger: &MatchEvent,
    verdict: &MatchEvent,
) -> VarOutcome {
    let label = session.clock.minute_label(verdict.minute);
    session.push_feed(label, verdict.text.clone());

    let subject = match trigger.var_type {
        Some(VarType::Goal | VarType::PhantomGoal) => "GOAL",
        Some(VarType::Penalty | VarType::PenaltyReview) => "PENALTY",
        Some(VarType::RedCard) => "RED CARD",
        None => "DECISION",
    };

    if verdict.decision != Some(VarDecision::Overturned) {
        info!("VAR at {}': {subject} confirmed", trigger.minute);
        session.show_banner(format!("VAR: {subject} CONFIRMED"), BannerTone::Var, None);
        return VarOutcome::Confirmed;
    }

    let text = match trigger.var_type {
        Some(VarType::Goal | VarType::PhantomGoal) => {
            let side = if trigger.side != Side::None { trigger.side } else { verdict.side };
            if side == Side::None {
                warn!("overturned goal at {}' has no side, score unchanged", trigger.minute);
            }
            session.live_score.revoke(side);
            format!("VAR: GOAL DISALLOWED {}", team_tag(result, side))
        }
        Some(VarType::Penalty | VarType::PenaltyReview) => "VAR: PENALTY OVERTURNED".to_string(),
        Some(VarType::RedCard) => "VAR: RED CARD REVOKED".to_string(),
        None => "VAR: DECISION OVERTURNED".to_string(),
    };
    info!("VAR at {}': {subject} overturned", trigger.minute);
    session.show_banner(text.trim_end(), BannerTone::Var, None);
    VarOutcome::Overturned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(minute: u16, side: Side, var_type: VarType) -> MatchEvent {
        MatchEvent::new(minute, EventKind::VarProcess, side, "VAR check").with_var_type(var_type)
    }

    fn verdict(minute: u16, side: Side, var_type: VarType, decision: VarDecision, text: &str) -> MatchEvent {
        MatchEvent::new(minute, EventKind::VarVerdict, side, text)
            .with_var_type(var_type)
            .with_decision(decision)
    }

    fn log(events: Vec<MatchEvent>) -> MatchResult {
        MatchResult { events, ..MatchResult::default() }
    }

    #[test]
    fn test_begin_pauses_clock_and_schedules() {
        let mut session = PlaybackSession::default();
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig::default();

        var.request(&mut session, trigger(67, Side::Away, VarType::Goal), &config);

        assert!(session.clock.paused);
        assert_eq!(session.pending_timers.len(), 2);
        let active = session.var_session.as_ref().unwrap();
        assert_eq!(active.stage, VarStage::Checking);
        assert_eq!(active.var_type, Some(VarType::Goal));
        assert_eq!(session.banner.as_ref().unwrap().tone, BannerTone::Var);
    }

    #[test]
    fn test_overturned_goal_is_taken_back() {
        let result = log(vec![verdict(68, Side::None, VarType::Goal, VarDecision::Overturned, "Offside")]);
        let mut session = PlaybackSession::default();
        session.live_score.away = 1;
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig::default();

        var.request(&mut session, trigger(67, Side::Away, VarType::Goal), &config);
        let outcome = var.resolve(&mut session, &result, &config);

        assert_eq!(outcome, Some(VarOutcome::Overturned));
        assert_eq!(session.live_score.away, 0);
        assert_eq!(session.feed.len(), 1);
        assert_eq!(session.feed[0].text, "Offside");
        assert!(session.clock.paused);

        var.finish(&mut session, &config);
        assert!(!session.clock.paused);
        assert!(session.var_session.is_none());
        assert_eq!(session.banner, None);
    }

    #[test]
    fn test_confirmed_verdict_keeps_score() {
        let result = log(vec![verdict(64, Side::Away, VarType::RedCard, VarDecision::Confirmed, "Red stands")]);
        let mut session = PlaybackSession::default();
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig::default();

        var.request(&mut session, trigger(63, Side::Away, VarType::RedCard), &config);
        assert_eq!(var.resolve(&mut session, &result, &config), Some(VarOutcome::Confirmed));
        assert_eq!(session.banner.as_ref().unwrap().text, "VAR: RED CARD CONFIRMED");
        assert_eq!(session.live_score, Default::default());
    }

    #[test]
    fn test_missing_verdict_falls_back() {
        let result = log(vec![]);
        let mut session = PlaybackSession::default();
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig::default();

        var.request(&mut session, trigger(31, Side::Away, VarType::Penalty), &config);
        assert_eq!(var.resolve(&mut session, &result, &config), Some(VarOutcome::NoVerdict));
        assert_eq!(session.banner.as_ref().unwrap().text, "VAR: CHECK COMPLETED");
        assert!(session.feed.is_empty());
    }

    #[test]
    fn test_verdict_lookup_ignores_earlier_and_other_side() {
        let result = log(vec![
            verdict(10, Side::Home, VarType::Goal, VarDecision::Overturned, "too early"),
            verdict(40, Side::Home, VarType::Goal, VarDecision::Overturned, "other side"),
            verdict(41, Side::Away, VarType::Penalty, VarDecision::Overturned, "other type"),
            verdict(42, Side::Away, VarType::Goal, VarDecision::Confirmed, "this one"),
        ]);
        let var = VarCoordinator::default();
        let review = trigger(40, Side::Away, VarType::Goal);
        assert_eq!(var.find_verdict(&result, &review, review.var_type), Some(3));
    }

    #[test]
    fn test_each_verdict_is_consumed_once() {
        let result = log(vec![verdict(20, Side::None, VarType::Goal, VarDecision::Overturned, "No goal")]);
        let mut session = PlaybackSession::default();
        session.live_score.home = 2;
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig::default();

        var.request(&mut session, trigger(20, Side::Home, VarType::Goal), &config);
        var.resolve(&mut session, &result, &config);
        var.finish(&mut session, &config);
        var.request(&mut session, trigger(20, Side::Home, VarType::Goal), &config);
        assert_eq!(var.resolve(&mut session, &result, &config), Some(VarOutcome::NoVerdict));
        assert_eq!(session.live_score.home, 1);
    }

    #[test]
    fn test_second_review_queues_until_first_finishes() {
        let mut session = PlaybackSession::default();
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig::default();

        var.request(&mut session, trigger(70, Side::Home, VarType::Goal), &config);
        var.request(&mut session, trigger(70, Side::Away, VarType::RedCard), &config);
        assert_eq!(var.queued(), 1);

        var.resolve(&mut session, &log(vec![]), &config);
        var.finish(&mut session, &config);

        assert_eq!(var.queued(), 0);
        assert!(session.clock.paused);
        let active = session.var_session.as_ref().unwrap();
        assert_eq!(active.var_type, Some(VarType::RedCard));
        assert_eq!(active.stage, VarStage::Checking);
    }

    #[test]
    fn test_pulse_stops_after_check_ticks() {
        let mut session = PlaybackSession::default();
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig { var_check_ticks: 3, ..PlaybackConfig::default() };

        var.request(&mut session, trigger(12, Side::Home, VarType::PenaltyReview), &config);
        for _ in 0..5 {
            var.pulse(&mut session, &config);
        }
        let active = session.var_session.as_ref().unwrap();
        assert_eq!(active.elapsed_check_ticks, 3);
        assert!(active.pulse.is_none());
    }

    #[test]
    fn test_resolve_cancels_pending_pulse() {
        let mut session = PlaybackSession::default();
        let mut var = VarCoordinator::default();
        let config = PlaybackConfig::default();

        var.request(&mut session, trigger(12, Side::Home, VarType::Goal), &config);
        let pulse = session.var_session.as_ref().unwrap().pulse.unwrap();
        var.resolve(&mut session, &log(vec![]), &config);
        assert!(!session.pending_timers.contains(pulse));
        assert_eq!(session.var_session.as_ref().unwrap().stage, VarStage::Resolving);
    }
}
