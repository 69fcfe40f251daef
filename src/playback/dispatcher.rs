use crate::playback::config::PlaybackConfig;
use crate::playback::recovery::is_recovery_notice;
use crate::playback::session::{BannerTone, PlaybackSession};
use log::{debug, warn};
use matchcast_api::{EventKind, MatchEvent, MatchResult, Side};

/// Composite identity guaranteeing at-most-once dispatch.
pub fn dedup_key(event: &MatchEvent) -> String {
    format!("{}|{}|{}", event.minute, event.kind.label(), event.text)
}

/// Dispatch every unseen event at or before `minute`, in log order.
///
/// Verdicts are skipped: only the VAR coordinator reads them. Once a
/// `VAR_PROCESS` goes out, the rest of its minute is still dispatched but
/// later minutes wait for the clock to resume. Returned events are the VAR
/// triggers, in order.
pub fn dispatch_due(
    session: &mut PlaybackSession,
    result: &MatchResult,
    minute: u16,
    config: &PlaybackConfig,
) -> Vec<MatchEvent> {
    let mut triggers = Vec::new();
    let mut held_minute: Option<u16> = None;

    for event in result.events.iter().take_while(|e| e.minute <= minute) {
        if event.kind == EventKind::VarVerdict {
            continue;
        }
        if held_minute.is_some_and(|held| event.minute != held) {
            break;
        }
        if !session.seen_event_ids.insert(dedup_key(event)) {
            continue;
        }

        // Banners belong to the review while one is on screen.
        let banners_allowed = held_minute.is_none() && session.var_session.is_none();
        debug!("dispatch {} at {minute}", dedup_key(event));

        match event.kind {
            EventKind::Goal => {
                push_event(session, event);
                if event.side == Side::None {
                    warn!("goal at minute {} has no side, score unchanged", event.minute);
                    continue;
                }
                session.live_score.credit(event.side);
                session
                    .momentum
                    .shift_toward(event.side, config.goal_momentum_shift);
                if banners_allowed {
                    let text = format!("GOAL! {}", team_tag(result, event.side));
                    session.show_banner(text.trim_end(), BannerTone::Goal, Some(config.banner_ms));
                }
            }
            EventKind::PenaltyAwarded => {
                push_event(session, event);
                if banners_allowed {
                    let text = format!("PENALTY {}", team_tag(result, event.side));
                    session.show_banner(text.trim_end(), BannerTone::Alert, Some(config.banner_ms));
                }
            }
            EventKind::RedCard => {
                push_event(session, event);
                if banners_allowed {
                    let text = format!("RED CARD {}", team_tag(result, event.side));
                    session.show_banner(text.trim_end(), BannerTone::Card, Some(config.banner_ms));
                }
            }
            EventKind::VarProcess => {
                held_minute = Some(event.minute);
                triggers.push(event.clone());
            }
            EventKind::Info if is_recovery_notice(event) => {}
            EventKind::VarVerdict | EventKind::Info | EventKind::Other => push_event(session, event),
        }
    }

    triggers
}

fn push_event(session: &mut PlaybackSession, event: &MatchEvent) {
    let label = session.clock.minute_label(event.minute);
    session.push_feed(label, event.text.clone());
}

pub(crate) fn team_tag(result: &MatchResult, side: Side) -> &str {
    result.team(side).map(|t| t.short_name.as_str()).unwrap_or("")
}
