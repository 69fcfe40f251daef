use crate::playback::config::PlaybackConfig;
use crate::playback::recovery::{FIRST_HALF_END, InjuryTime, SECOND_HALF_END};
use serde::Serialize;

const SECOND_HALF_KICKOFF: f64 = 46.0;
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockPhase {
    #[default]
    Regular,
    InjuryFirstHalf,
    HalftimePause,
    InjurySecondHalf,
    FullTime,
}

/// What one `advance` did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTransition {
    Frozen,
    Running,
    InjuryTimeStarted,
    HalfTime,
    FullTime,
}

/// Rates the clock advances at, fixed for a whole session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPace {
    pub regulation_step: f64,
    pub injury_ticks_per_minute: u32,
    pub injury: InjuryTime,
}

impl ClockPace {
    pub fn new(config: &PlaybackConfig, injury: InjuryTime) -> Self {
        Self {
            regulation_step: config.regulation_step(),
            injury_ticks_per_minute: config.injury_ticks_per_minute.max(1),
            injury,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockState {
    /// Absolute virtual minute. Held at 45/90 through injury time.
    pub virtual_minute: f64,
    pub phase: ClockPhase,
    pub display_label: String,
    pub paused: bool,
    second_half: bool,
    injury_ticks: u32,
    injury_minutes: u16,
}

impl Default for ClockState {
    fn default() -> Self {
        Self {
            virtual_minute: 0.0,
            phase: ClockPhase::Regular,
            display_label: "0".to_string(),
            paused: false,
            second_half: false,
            injury_ticks: 0,
            injury_minutes: 0,
        }
    }
}

impl ClockState {
    /// Advance by one tick. Paused clocks, halftime and full time are frozen.
    pub fn advance(&mut self, pace: &ClockPace) -> ClockTransition {
        if self.paused {
            return ClockTransition::Frozen;
        }

        let transition = match self.phase {
            ClockPhase::Regular => self.advance_regular(pace),
            ClockPhase::InjuryFirstHalf | ClockPhase::InjurySecondHalf => self.advance_injury(pace),
            ClockPhase::HalftimePause | ClockPhase::FullTime => return ClockTransition::Frozen,
        };
        self.refresh_label();
        transition
    }

    fn advance_regular(&mut self, pace: &ClockPace) -> ClockTransition {
        let (boundary, injury_phase) = if self.second_half {
            (SECOND_HALF_END, ClockPhase::InjurySecondHalf)
        } else {
            (FIRST_HALF_END, ClockPhase::InjuryFirstHalf)
        };
        let next = self.virtual_minute + pace.regulation_step;
        if next + EPSILON < f64::from(boundary) {
            self.virtual_minute = next;
            return ClockTransition::Running;
        }

        self.virtual_minute = f64::from(boundary);
        self.phase = injury_phase;
        self.injury_ticks = 0;
        self.injury_minutes = 0;
        ClockTransition::InjuryTimeStarted
    }

    fn advance_injury(&mut self, pace: &ClockPace) -> ClockTransition {
        let first_half = self.phase == ClockPhase::InjuryFirstHalf;
        let target = if first_half {
            pace.injury.first_half
        } else {
            pace.injury.second_half
        };

        // The final injury minute gets a full tick on screen before the whistle.
        if self.injury_minutes >= target {
            return if first_half {
                self.phase = ClockPhase::HalftimePause;
                self.virtual_minute = SECOND_HALF_KICKOFF;
                self.paused = true;
                ClockTransition::HalfTime
            } else {
                self.phase = ClockPhase::FullTime;
                ClockTransition::FullTime
            };
        }

        self.injury_ticks += 1;
        self.injury_minutes = u16::try_from(self.injury_ticks / pace.injury_ticks_per_minute)
            .unwrap_or(u16::MAX);
        ClockTransition::Running
    }

    /// Leave the halftime pause; the second half kicks off at minute 46.
    pub fn resume_second_half(&mut self) {
        if self.phase != ClockPhase::HalftimePause {
            return;
        }
        self.phase = ClockPhase::Regular;
        self.second_half = true;
        self.paused = false;
        self.refresh_label();
    }

    /// Minute the dispatcher matches events against; `None` while play is
    /// not running.
    pub fn effective_minute(&self) -> Option<u16> {
        match self.phase {
            ClockPhase::Regular => Some(self.virtual_minute.floor() as u16),
            ClockPhase::InjuryFirstHalf => Some(FIRST_HALF_END + self.injury_minutes),
            ClockPhase::InjurySecondHalf => Some(SECOND_HALF_END + self.injury_minutes),
            ClockPhase::HalftimePause | ClockPhase::FullTime => None,
        }
    }

    /// Label for an event minute as a broadcast would print it, e.g. `45+2`
    /// for minute 47 announced during first-half injury time.
    pub fn minute_label(&self, minute: u16) -> String {
        match self.phase {
            ClockPhase::InjuryFirstHalf if minute > FIRST_HALF_END => {
                format!("{FIRST_HALF_END}+{}", minute - FIRST_HALF_END)
            }
            ClockPhase::InjurySecondHalf | ClockPhase::FullTime if minute > SECOND_HALF_END => {
                format!("{SECOND_HALF_END}+{}", minute - SECOND_HALF_END)
            }
            _ => minute.to_string(),
        }
    }

    fn refresh_label(&mut self) {
        self.display_label = match self.phase {
            ClockPhase::Regular => format!("{}", self.virtual_minute.floor() as u16),
            ClockPhase::InjuryFirstHalf | ClockPhase::InjurySecondHalf => {
                let base = if self.phase == ClockPhase::InjuryFirstHalf {
                    FIRST_HALF_END
                } else {
                    SECOND_HALF_END
                };
                format!("{base}+{}", self.injury_minutes)
            }
            ClockPhase::HalftimePause => "HT".to_string(),
            ClockPhase::FullTime => "FT".to_string(),
        };
    }
}
