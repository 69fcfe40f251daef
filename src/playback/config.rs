use crate::playback::recovery::InjuryTime;
use log::warn;

/// Longest accepted tick period.
pub const MAX_TICK_MS: u64 = 60_000;

/// Timing and tuning constants for one playback session.
///
/// Defaults compress the 90 regulation minutes into 30 s of wall-clock time
/// at a 100 ms tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub tick_ms: u64,
    /// Wall-clock budget mapped onto 90 virtual minutes.
    pub regulation_ms: u64,
    /// Injury time advances one virtual minute per this many ticks.
    pub injury_ticks_per_minute: u32,
    pub halftime_ms: u64,
    pub banner_ms: u64,
    pub var_check_ticks: u32,
    pub var_resolve_ms: u64,
    pub var_exit_ms: u64,
    pub summary_delay_ms: u64,
    pub default_injury: InjuryTime,
    pub goal_momentum_shift: f64,
    pub momentum_jitter: f64,
    pub seed: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            regulation_ms: 30_000,
            injury_ticks_per_minute: 15,
            halftime_ms: 3_000,
            banner_ms: 2_000,
            var_check_ticks: 60,
            var_resolve_ms: 6_000,
            var_exit_ms: 3_000,
            summary_delay_ms: 2_000,
            default_injury: InjuryTime::default(),
            goal_momentum_shift: 15.0,
            momentum_jitter: 2.0,
            seed: 0x6d61_7463_6863_6173,
        }
    }
}

impl PlaybackConfig {
    /// Defaults overridden by `MATCHCAST_TICK_MS`, `MATCHCAST_DURATION_MS` and
    /// `MATCHCAST_SEED`. Without a seed each run gets a fresh random walk.
    pub fn from_env() -> Self {
        let mut config = Self {
            seed: rand::random(),
            ..Self::default()
        };
        if let Some(tick_ms) = env_u64("MATCHCAST_TICK_MS") {
            config.tick_ms = tick_ms;
        }
        if let Some(regulation_ms) = env_u64("MATCHCAST_DURATION_MS") {
            config.regulation_ms = regulation_ms;
        }
        if let Some(seed) = env_u64("MATCHCAST_SEED") {
            config.seed = seed;
        }
        config.validated()
    }

    /// Same pacing at a different tick period. Regulation and timer budgets
    /// stay in wall-clock milliseconds.
    #[cfg(test)]
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self.validated()
    }

    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_ms == 0 {
            warn!("tick period must be positive, using {} ms", defaults.tick_ms);
            self.tick_ms = defaults.tick_ms;
        }
        if self.tick_ms > MAX_TICK_MS {
            warn!("tick period {} ms is too long, clamping to {MAX_TICK_MS} ms", self.tick_ms);
            self.tick_ms = MAX_TICK_MS;
        }
        if self.regulation_ms < self.tick_ms {
            warn!(
                "regulation budget {} ms is shorter than one tick, clamping",
                self.regulation_ms
            );
            self.regulation_ms = self.tick_ms;
        }
        if self.injury_ticks_per_minute == 0 {
            self.injury_ticks_per_minute = defaults.injury_ticks_per_minute;
        }
        self
    }

    /// Virtual minutes added per regulation tick: `90 / (regulation / tick)`.
    pub fn regulation_step(&self) -> f64 {
        90.0 * self.tick_ms as f64 / self.regulation_ms as f64
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("ignoring {name}={raw:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_step_is_three_tenths() {
        let config = PlaybackConfig::default();
        assert!((config.regulation_step() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_step_scales_with_tick() {
        let fine = PlaybackConfig::default().with_tick_ms(50);
        let coarse = PlaybackConfig::default().with_tick_ms(200);
        assert!((fine.regulation_step() - 0.15).abs() < 1e-12);
        assert!((coarse.regulation_step() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_tick_falls_back_to_default() {
        let config = PlaybackConfig::default().with_tick_ms(0);
        assert_eq!(config.tick_ms, 100);
    }

    #[test]
    fn test_huge_tick_is_clamped() {
        let config = PlaybackConfig::default().with_tick_ms(u64::MAX / 2);
        assert_eq!(config.tick_ms, MAX_TICK_MS);
        assert_eq!(config.regulation_ms, MAX_TICK_MS);
    }

    #[test]
    fn test_regulation_never_shorter_than_a_tick() {
        let config = PlaybackConfig {
            regulation_ms: 10,
            ..PlaybackConfig::default()
        }
        .validated();
        assert_eq!(config.regulation_ms, config.tick_ms);
        assert!((config.regulation_step() - 90.0).abs() < 1e-12);
    }
}
