use crate::playback::{PlaybackController, Snapshot};
use crate::state::messages::PlaybackCommand;
use log::{debug, error};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

/// Owns the playback controller and ticks it in real time. Snapshots go out
/// only when something visible changed.
pub struct PlaybackDriver {
    controller: PlaybackController,
    commands: mpsc::Receiver<PlaybackCommand>,
    snapshots: mpsc::Sender<Snapshot>,
}

impl PlaybackDriver {
    pub fn new(
        controller: PlaybackController,
        commands: mpsc::Receiver<PlaybackCommand>,
        snapshots: mpsc::Sender<Snapshot>,
    ) -> Self {
        Self { controller, commands, snapshots }
    }

    pub async fn run(mut self) {
        let period = Duration::from_millis(self.controller.config().tick_ms);
        let mut ticker = interval(period);
        // A stalled UI must not make the match sprint to catch up.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_sent: Option<Snapshot> = None;

        loop {
            let active = self.controller.is_active();
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("playback command channel closed");
                        break;
                    };
                    match command {
                        PlaybackCommand::Start(result) => {
                            self.controller.start(*result);
                            ticker.reset();
                        }
                        PlaybackCommand::Stop => {
                            if !self.controller.stop() {
                                debug!("stop ignored, no playback running");
                            }
                        }
                    }
                }
                _ = ticker.tick(), if active => {
                    self.controller.tick();
                }
            }

            let snapshot = self.controller.snapshot();
            if last_sent.as_ref() != Some(&snapshot) {
                if let Err(e) = self.snapshots.send(snapshot.clone()).await {
                    error!("Failed to send playback snapshot: {e}");
                    break;
                }
                last_sent = Some(snapshot);
            }
        }

        self.controller.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackConfig;
    use matchcast_api::{EventKind, MatchEvent, MatchResult, Side};

    fn one_goal() -> MatchResult {
        MatchResult {
            final_home_goals: 1,
            events: vec![MatchEvent::new(23, EventKind::Goal, Side::Home, "GOAL! Lautaro")],
            ..MatchResult::default()
        }
    }

    fn spawn_driver() -> (mpsc::Sender<PlaybackCommand>, mpsc::Receiver<Snapshot>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (snap_tx, snap_rx) = mpsc::channel(1024);
        let controller = PlaybackController::new(PlaybackConfig::default());
        tokio::spawn(PlaybackDriver::new(controller, cmd_rx, snap_tx).run());
        (cmd_tx, snap_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_plays_through_to_summary() {
        let (commands, mut snapshots) = spawn_driver();
        commands.send(PlaybackCommand::Start(Box::new(one_goal()))).await.unwrap();

        let mut last = Snapshot::default();
        while let Some(snapshot) = snapshots.recv().await {
            let done = snapshot.summary_ready;
            last = snapshot;
            if done {
                break;
            }
        }

        assert!(last.terminal);
        assert_eq!(last.live_score.home, 1);
        assert_eq!(last.event_feed, vec!["23' GOAL! Lautaro"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_command_halts_snapshots() {
        let (commands, mut snapshots) = spawn_driver();
        commands.send(PlaybackCommand::Start(Box::new(one_goal()))).await.unwrap();

        while let Some(snapshot) = snapshots.recv().await {
            if snapshot.clock_label == "10" {
                break;
            }
        }
        commands.send(PlaybackCommand::Stop).await.unwrap();

        let mut stopped = None;
        while let Some(snapshot) = snapshots.recv().await {
            if snapshot.terminal {
                stopped = Some(snapshot);
                break;
            }
        }
        let stopped = stopped.expect("stop produces a terminal snapshot");
        assert!(!stopped.summary_ready);
        assert_eq!(stopped.banner, None);

        let next = tokio::time::timeout(Duration::from_secs(60), snapshots.recv()).await;
        assert!(next.is_err(), "no snapshots after stop");
    }
}
