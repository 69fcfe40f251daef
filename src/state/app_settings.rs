use crate::playback::PlaybackConfig;
use log::{LevelFilter, warn};
use std::str::FromStr;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub playback: PlaybackConfig,
}

impl AppSettings {
    /// Read once at start-up. `MATCHCAST_LOG_LEVEL` takes the usual level
    /// names (`error`, `warn`, `info`, `debug`, `trace`, `off`).
    pub fn load() -> Self {
        Self {
            full_screen: false,
            log_level: std::env::var("MATCHCAST_LOG_LEVEL")
                .ok()
                .and_then(|raw| parse_log_level(&raw)),
            playback: PlaybackConfig::from_env(),
        }
    }
}

fn parse_log_level(raw: &str) -> Option<LevelFilter> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match LevelFilter::from_str(raw) {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("ignoring MATCHCAST_LOG_LEVEL={raw}");
            None
        }
    }
}
