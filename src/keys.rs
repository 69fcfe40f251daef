use crate::app::{App, MenuItem};
use crate::state::messages::{NetworkRequest, PlaybackCommand};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    playback_commands: &mpsc::Sender<PlaybackCommand>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Warmup),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Live),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Summary),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Warm-up: kick off, or retry a failed load
        (MenuItem::Warmup, KeyCode::Enter, _) => {
            if guard.state.warmup.result.is_none() {
                let match_id = guard.state.warmup.match_id.clone();
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadMatch { match_id })
                    .await;
                return;
            }
            if guard.is_playing() {
                guard.update_tab(MenuItem::Live);
                return;
            }
            if let Some(result) = guard.begin_playback() {
                drop(guard);
                let _ = playback_commands
                    .send(PlaybackCommand::Start(Box::new(result)))
                    .await;
                return;
            }
        }

        // Playback control
        (MenuItem::Live | MenuItem::Summary, Char('r'), _) => {
            if let Some(result) = guard.begin_playback() {
                debug!("replaying from kickoff");
                drop(guard);
                let _ = playback_commands
                    .send(PlaybackCommand::Start(Box::new(result)))
                    .await;
                return;
            }
        }
        (_, Char('s'), _) => {
            drop(guard);
            let _ = playback_commands.send(PlaybackCommand::Stop).await;
            return;
        }

        // Feed scrolling
        (MenuItem::Live | MenuItem::Summary, Char('j') | KeyCode::Down, _) => {
            guard.state.live.scroll_down();
        }
        (MenuItem::Live | MenuItem::Summary, Char('k') | KeyCode::Up, _) => {
            guard.state.live.scroll_up();
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
