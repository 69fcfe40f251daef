use crate::playback::clock::{ClockPace, ClockTransition};
use crate::playback::config::PlaybackConfig;
use crate::playback::dispatcher::dispatch_due;
use crate::playback::momentum::MomentumProcess;
use crate::playback::recovery::InjuryTime;
use crate::playback::session::{BannerTone, PlaybackSession, Score, Snapshot};
use crate::playback::timers::TimerAction;
use crate::playback::var::VarCoordinator;
use log::{debug, info, warn};
use matchcast_api::MatchResult;

/// Upper bound for `run_until_settled`; a default-paced match needs ~700.
const MAX_SETTLE_TICKS: u64 = 5_000_000;

/// Drives one match playback and is the only thing that mutates its session.
///
/// Each tick: due timers fire, the clock advances unless paused, newly
/// reached events are dispatched (VAR triggers go to the coordinator), and
/// the momentum walk steps unless paused.
#[derive(Debug)]
pub struct PlaybackController {
    config: PlaybackConfig,
    result: MatchResult,
    pace: ClockPace,
    session: Option<PlaybackSession>,
    var: VarCoordinator,
    momentum: MomentumProcess,
}

impl PlaybackController {
    pub fn new(config: PlaybackConfig) -> Self {
        let config = config.validated();
        Self {
            pace: ClockPace::new(&config, config.default_injury),
            momentum: MomentumProcess::new(config.seed, config.momentum_jitter),
            result: MatchResult::default(),
            session: None,
            var: VarCoordinator::default(),
            config,
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn injury_time(&self) -> InjuryTime {
        self.pace.injury
    }

    /// Begin a fresh playback, tearing down any previous one first.
    pub fn start(&mut self, mut result: MatchResult) {
        self.stop();
        result.normalize();

        let injury = InjuryTime::from_events(&result.events, self.config.default_injury);
        info!(
            "kickoff {} v {}: {} events, injury time {}/{}",
            result.home.name,
            result.away.name,
            result.events.len(),
            injury.first_half,
            injury.second_half
        );

        self.pace = ClockPace::new(&self.config, injury);
        self.var.reset();
        self.momentum = MomentumProcess::new(self.config.seed, self.config.momentum_jitter);
        self.result = result;
        self.session = Some(PlaybackSession::default());
    }

    /// Halt the loop and cancel every pending timer. Returns false when
    /// there was nothing left to stop.
    pub fn stop(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let stopped = shutdown(session);
        if stopped {
            self.var.reset();
        }
        stopped
    }

    /// The loop should keep ticking: play is on, or full time is waiting on
    /// its summary timer.
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.stopped)
    }

    /// Play is on; false from the final whistle onward.
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.terminal)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session
            .as_ref()
            .map(PlaybackSession::snapshot)
            .unwrap_or_default()
    }

    pub fn tick(&mut self) {
        let Self {
            config,
            result,
            pace,
            session,
            var,
            momentum,
        } = self;
        let Some(session) = session.as_mut() else {
            return;
        };
        if session.stopped {
            return;
        }
        session.elapsed_ms = session.elapsed_ms.saturating_add(config.tick_ms);

        while let Some((handle, action)) = session.pending_timers.pop_due(session.elapsed_ms) {
            match action {
                TimerAction::ClearBanner => session.expire_banner(handle),
                TimerAction::ResumeSecondHalf => {
                    session.clear_banner();
                    session.clock.resume_second_half();
                    info!("second half underway");
                }
                TimerAction::VarPulse => var.pulse(session, config),
                TimerAction::VarResolve => {
                    var.resolve(session, result, config);
                }
                TimerAction::VarExit => var.finish(session, config),
                TimerAction::SummaryReady => {
                    session.summary_ready = true;
                    info!("match summary available");
                    shutdown(session);
                }
            }
            if session.stopped {
                var.reset();
                return;
            }
        }

        if session.terminal || session.clock.paused {
            return;
        }

        match session.clock.advance(pace) {
            ClockTransition::HalfTime => {
                info!("half time {}-{}", session.live_score.home, session.live_score.away);
                session.show_banner("HALF TIME", BannerTone::Info, None);
                session.schedule(config.halftime_ms, TimerAction::ResumeSecondHalf);
                return;
            }
            ClockTransition::FullTime => {
                enter_full_time(session, result, var, config);
                return;
            }
            ClockTransition::InjuryTimeStarted => {
                debug!("injury time from {}'", session.clock.display_label);
            }
            ClockTransition::Running | ClockTransition::Frozen => {}
        }

        if let Some(minute) = session.clock.effective_minute() {
            for trigger in dispatch_due(session, result, minute, config) {
                var.request(session, trigger, config);
            }
        }

        if !session.clock.paused {
            momentum.advance(&mut session.momentum);
        }
    }

    /// Tick without sleeping until the session settles. Used by headless
    /// mode and tests.
    pub fn run_until_settled(&mut self) -> Snapshot {
        let mut ticks = 0u64;
        while self.is_active() {
            if ticks >= MAX_SETTLE_TICKS {
                warn!("playback did not settle after {ticks} ticks, stopping");
                self.stop();
                break;
            }
            self.tick();
            ticks += 1;
        }
        self.snapshot()
    }
}

/// The final whistle: nothing scheduled earlier may fire afterwards. Only
/// the summary timer survives.
fn enter_full_time(
    session: &mut PlaybackSession,
    result: &MatchResult,
    var: &mut VarCoordinator,
    config: &PlaybackConfig,
) {
    let cancelled = session.cancel_timers();
    if var.queued() > 0 {
        warn!("full time with {} VAR reviews still queued, dropping them", var.queued());
    }
    var.reset();
    session.var_session = None;
    session.terminal = true;
    session.show_banner("FULL TIME", BannerTone::Info, None);
    session.schedule(config.summary_delay_ms, TimerAction::SummaryReady);

    let score = session.live_score;
    info!("full time {}-{} ({cancelled} timers cancelled)", score.home, score.away);
    let reported = Score {
        home: result.final_home_goals,
        away: result.final_away_goals,
    };
    if reported != score {
        warn!(
            "replayed score {}-{} differs from reported final {}-{}",
            score.home, score.away, reported.home, reported.away
        );
    }
}

/// Shared by `stop()` and the summary timer, which stops the session from
/// inside its own callback.
fn shutdown(session: &mut PlaybackSession) -> bool {
    if session.stopped {
        return false;
    }
    let cancelled = session.cancel_timers();
    if !session.terminal {
        session.banner = None;
    }
    session.var_session = None;
    session.clock.paused = true;
    session.terminal = true;
    session.stopped = true;
    debug!("playback stopped, {cancelled} pending timers cancelled");
    true
}
