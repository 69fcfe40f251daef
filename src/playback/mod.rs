//! Deterministic replay of a finished match as if it were live.
//!
//! Everything here is synchronous and driven by `PlaybackController::tick`;
//! wall-clock pacing belongs to the caller.

pub mod clock;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod momentum;
pub mod recovery;
pub mod session;
pub mod timers;
pub mod var;

pub use clock::ClockPhase;
pub use config::PlaybackConfig;
pub use controller::PlaybackController;
pub use momentum::{Leaning, Momentum};
pub use session::{Banner, BannerTone, Snapshot};
