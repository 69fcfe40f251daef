use matchcast_api::Side;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

pub const MOMENTUM_MIN: f64 = 0.0;
pub const MOMENTUM_MAX: f64 = 100.0;
const LEAN_HOME_ABOVE: f64 = 60.0;
const LEAN_AWAY_BELOW: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Leaning {
    Home,
    Away,
}

/// Which side is on top: 100 is all home, 0 is all away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Momentum {
    pub value: f64,
    pub leaning: Leaning,
}

impl Default for Momentum {
    fn default() -> Self {
        Self { value: 50.0, leaning: Leaning::Home }
    }
}

impl Momentum {
    pub fn nudge(&mut self, delta: f64) {
        self.value = (self.value + delta).clamp(MOMENTUM_MIN, MOMENTUM_MAX);
        // Between the thresholds the previous leaning holds.
        if self.value > LEAN_HOME_ABOVE {
            self.leaning = Leaning::Home;
        } else if self.value < LEAN_AWAY_BELOW {
            self.leaning = Leaning::Away;
        }
    }

    pub fn shift_toward(&mut self, side: Side, amount: f64) {
        match side {
            Side::Home => self.nudge(amount),
            Side::Away => self.nudge(-amount),
            Side::None => {}
        }
    }
}

/// Bounded random walk, advanced once per running tick.
#[derive(Debug)]
pub struct MomentumProcess {
    rng: ChaCha8Rng,
    jitter: f64,
}

impl MomentumProcess {
    pub fn new(seed: u64, jitter: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            jitter: jitter.abs(),
        }
    }

    pub fn advance(&mut self, momentum: &mut Momentum) {
        if self.jitter == 0.0 {
            return;
        }
        let delta = self.rng.gen_range(-self.jitter..=self.jitter);
        momentum.nudge(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_goal_shift_is_clamped() {
        let mut momentum = Momentum { value: 95.0, leaning: Leaning::Home };
        momentum.shift_toward(Side::Home, 15.0);
        assert_eq!(momentum.value, 100.0);

        let mut momentum = Momentum { value: 5.0, leaning: Leaning::Away };
        momentum.shift_toward(Side::Away, 15.0);
        assert_eq!(momentum.value, 0.0);
    }

    #[test]
    fn test_leaning_has_hysteresis() {
        let mut momentum = Momentum::default();
        momentum.nudge(-15.0); // 35
        assert_eq!(momentum.leaning, Leaning::Away);
        momentum.nudge(20.0); // 55: still inside the band
        assert_eq!(momentum.leaning, Leaning::Away);
        momentum.nudge(6.0); // 61
        assert_eq!(momentum.leaning, Leaning::Home);
        momentum.nudge(-15.0); // 46
        assert_eq!(momentum.leaning, Leaning::Home);
    }

    #[test]
    fn test_sideless_shift_is_ignored() {
        let mut momentum = Momentum::default();
        momentum.shift_toward(Side::None, 15.0);
        assert_eq!(momentum, Momentum::default());
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = MomentumProcess::new(7, 2.0);
        let mut b = MomentumProcess::new(7, 2.0);
        let (mut ma, mut mb) = (Momentum::default(), Momentum::default());
        for _ in 0..500 {
            a.advance(&mut ma);
            b.advance(&mut mb);
        }
        assert_eq!(ma, mb);
    }

    proptest! {
        #[test]
        fn prop_walk_stays_in_bounds(seed in any::<u64>(), jitter in 0.0f64..40.0, goals in proptest::collection::vec(any::<bool>(), 0..20)) {
            let mut process = MomentumProcess::new(seed, jitter);
            let mut momentum = Momentum::default();
            for tick in 0..2_000usize {
                process.advance(&mut momentum);
                if let Some(&home) = goals.get(tick % 100) {
                    momentum.shift_toward(if home { Side::Home } else { Side::Away }, 15.0);
                }
                prop_assert!((MOMENTUM_MIN..=MOMENTUM_MAX).contains(&momentum.value));
            }
        }
    }
}
