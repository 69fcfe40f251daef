//! Injury-time lengths announced in the event log.
//!
//! The resolver announces recovery time as a free-text `INFO` event at minute
//! 45 or 90 ("4 minuti di recupero"). Extraction lives here so the clock only
//! ever sees two integers.

use log::warn;
use matchcast_api::{EventKind, MatchEvent};
use regex::Regex;
use std::sync::LazyLock;

pub const FIRST_HALF_END: u16 = 45;
pub const SECOND_HALF_END: u16 = 90;

/// An integer followed by a recovery phrase, Italian or English. Whitespace
/// inside the phrase is free-form.
const RECOVERY_PATTERN: &str = r"(?i)([0-9]+)\s*(?:'|min(?:ut[io]|\.)?|minutes?)\s+(?:di\s+recupero|of\s+(?:added|stoppage|injury)\s+time|added)";

static RECOVERY_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(RECOVERY_PATTERN));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjuryTime {
    pub first_half: u16,
    pub second_half: u16,
}

impl Default for InjuryTime {
    fn default() -> Self {
        Self { first_half: 2, second_half: 4 }
    }
}

impl InjuryTime {
    /// Scan the log for recovery announcements; halves without one keep the
    /// default length.
    pub fn from_events(events: &[MatchEvent], defaults: InjuryTime) -> Self {
        let announced = |half_end: u16| {
            events
                .iter()
                .filter(|e| e.kind == EventKind::Info && e.minute == half_end)
                .find_map(|e| parse_recovery_minutes(&e.text))
        };
        Self {
            first_half: announced(FIRST_HALF_END).unwrap_or(defaults.first_half),
            second_half: announced(SECOND_HALF_END).unwrap_or(defaults.second_half),
        }
    }
}

/// True for `INFO` events that only carry recovery-time metadata.
pub fn is_recovery_notice(event: &MatchEvent) -> bool {
    event.kind == EventKind::Info && parse_recovery_minutes(&event.text).is_some()
}

/// Extract `N` from text where an integer is followed by a recovery phrase.
pub fn parse_recovery_minutes(text: &str) -> Option<u16> {
    let re = match RECOVERY_RE.as_ref() {
        Ok(re) => re,
        Err(e) => {
            warn!("recovery pattern failed to compile: {e}");
            return None;
        }
    };
    re.captures_iter(text)
        .find_map(|caps| caps.get(1)?.as_str().parse::<u16>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(minute: u16, text: &str) -> MatchEvent {
        MatchEvent::new(minute, EventKind::Info, matchcast_api::Side::None, text)
    }

    #[test]
    fn test_parses_italian_announcement() {
        assert_eq!(parse_recovery_minutes("4 minuti di recupero"), Some(4));
        assert_eq!(parse_recovery_minutes("Saranno 6 Minuti di recupero"), Some(6));
        assert_eq!(parse_recovery_minutes("1 minuto di recupero"), Some(1));
    }

    #[test]
    fn test_parses_english_announcement() {
        assert_eq!(parse_recovery_minutes("+3 minutes of added time"), Some(3));
        assert_eq!(parse_recovery_minutes("Board shows 5 minutes added"), Some(5));
    }

    #[test]
    fn test_pattern_compiles() {
        assert!(RECOVERY_RE.is_ok());
    }

    #[test]
    fn test_irregular_whitespace_and_case() {
        assert_eq!(parse_recovery_minutes("4 minuti  di recupero"), Some(4));
        assert_eq!(parse_recovery_minutes("4 minuti\tdi recupero"), Some(4));
        assert_eq!(parse_recovery_minutes("4 MINUTI DI RECUPERO"), Some(4));
        assert_eq!(parse_recovery_minutes("Ci saranno 5 min.   di\nrecupero"), Some(5));
        assert_eq!(parse_recovery_minutes("3' di recupero"), Some(3));
        assert_eq!(parse_recovery_minutes("7 minutes of   stoppage  time"), Some(7));
    }

    #[test]
    fn test_number_must_precede_phrase() {
        assert_eq!(parse_recovery_minutes("recupero: 5"), None);
        assert_eq!(parse_recovery_minutes("Fine primo tempo al 45"), None);
        assert_eq!(parse_recovery_minutes("45' 3 ammonizioni, 2 minuti di recupero"), Some(2));
    }

    #[test]
    fn test_defaults_apply_without_announcements() {
        let injury = InjuryTime::from_events(&[], InjuryTime::default());
        assert_eq!(injury, InjuryTime { first_half: 2, second_half: 4 });
    }

    #[test]
    fn test_announcements_only_count_at_half_ends() {
        let events = vec![
            info(30, "3 minuti di recupero"),
            info(45, "4 minuti di recupero"),
            info(90, "nessun recupero"),
        ];
        let injury = InjuryTime::from_events(&events, InjuryTime::default());
        assert_eq!(injury, InjuryTime { first_half: 4, second_half: 4 });
    }

    #[test]
    fn test_recovery_notice_detection() {
        assert!(is_recovery_notice(&info(90, "5 minuti di recupero")));
        assert!(!is_recovery_notice(&info(46, "Inizia il secondo tempo")));
    }
}
