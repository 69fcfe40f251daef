mod app;
mod components;
mod draw;
mod keys;
mod playback;
mod state;
mod ui;

use crate::app::App;
use crate::playback::{PlaybackConfig, PlaybackController, Snapshot};
use crate::state::app_settings::AppSettings;
use crate::state::driver::PlaybackDriver;
use crate::state::messages::{NetworkRequest, NetworkResponse, PlaybackCommand, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use anyhow::Context;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use matchcast_api::client::{DEMO_MATCH_ID, ResolverClient};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliMode {
    Interactive { match_id: String },
    Summary { match_id: String },
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let match_id = match handle_cli_args() {
        CliMode::Exit => return Ok(()),
        CliMode::Summary { match_id } => return run_headless(&match_id).await,
        CliMode::Interactive { match_id } => match_id,
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal().context("failed to prepare terminal")?;

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let settings = AppSettings::load();
    let controller = PlaybackController::new(settings.playback.clone());
    let app = Arc::new(Mutex::new(App::new(settings, match_id)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (playback_cmd_tx, playback_cmd_rx) = mpsc::channel::<PlaybackCommand>(16);
    let (snapshot_tx, snapshot_rx) = mpsc::channel::<Snapshot>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(ResolverClient::from_env(), network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Playback thread, ticking the engine in real time
    let driver = PlaybackDriver::new(controller, playback_cmd_rx, snapshot_tx);
    let playback_task = tokio::spawn(driver.run());

    // Trigger match load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        playback_cmd_tx,
        snapshot_rx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    playback_task.abort();

    Ok(())
}

fn handle_cli_args() -> CliMode {
    match parse_cli_args(std::env::args().skip(1)) {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn parse_cli_args(args: impl IntoIterator<Item = String>) -> Result<CliMode, String> {
    let mut args = args.into_iter();
    let Some(arg) = args.next() else {
        return Ok(CliMode::Interactive { match_id: DEMO_MATCH_ID.to_string() });
    };

    let mode = match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            CliMode::Exit
        }
        "-V" | "--version" => {
            println!("matchcast {}", env!("CARGO_PKG_VERSION"));
            CliMode::Exit
        }
        "--summary" => CliMode::Summary {
            match_id: args.next().unwrap_or_else(|| DEMO_MATCH_ID.to_string()),
        },
        other if other.starts_with('-') => return Err(format!("Unknown argument: {other}")),
        match_id => CliMode::Interactive { match_id: match_id.to_string() },
    };

    match args.next() {
        Some(extra) => Err(format!("Unexpected argument: {extra}")),
        None => Ok(mode),
    }
}

fn usage_text() -> &'static str {
    "matchcast - replay a finished football match as if it were live

Usage:
  matchcast [MATCH_ID]
  matchcast --summary [MATCH_ID]
  matchcast --help
  matchcast --version

MATCH_ID defaults to the built-in demo match.

Environment:
  MATCHCAST_RESOLVER_URL   Match Resolver base URL
  MATCHCAST_MATCH_JSON     Path to a local resolver payload (overrides the URL)
  MATCHCAST_TICK_MS        Playback tick period in ms (default 100, max 60000)
  MATCHCAST_DURATION_MS    Wall-clock length of 90 minutes in ms (default 30000)
  MATCHCAST_SEED           Seed for the momentum walk
  MATCHCAST_LOG_LEVEL      error | warn | info | debug | trace"
}

/// Play the whole match without sleeping and print the final snapshot.
async fn run_headless(match_id: &str) -> anyhow::Result<()> {
    let client = ResolverClient::from_env();
    let result = client
        .fetch_match(match_id)
        .await
        .with_context(|| format!("could not load match {match_id}"))?;

    let mut controller = PlaybackController::new(PlaybackConfig::from_env());
    controller.start(result);
    let snapshot = controller.run_until_settled();

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    playback_commands: mpsc::Sender<PlaybackCommand>,
    mut snapshots: mpsc::Receiver<Snapshot>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw =
                    handle_ui_event(ui_event, &app, &network_requests, &playback_commands).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(snapshot) = snapshots.recv() => {
                let mut app_guard = app.lock().await;
                app_guard.on_snapshot(snapshot);
                if !loading.is_loading {
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    playback_commands: &mpsc::Sender<PlaybackCommand>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let match_id = app.lock().await.state.warmup.match_id.clone();
            let _ = network_requests
                .send(NetworkRequest::LoadMatch { match_id: match_id.clone() })
                .await;
            let _ = network_requests
                .send(NetworkRequest::LoadLineups { match_id })
                .await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests, playback_commands).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::MatchLoaded { result } => {
            app.lock().await.on_match_loaded(*result);
        }
        NetworkResponse::LineupsLoaded { lineups } => {
            app.lock().await.on_lineups_loaded(lineups);
        }
        NetworkResponse::LineupsUnavailable { message } => {
            app.lock().await.on_lineups_unavailable(message);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            app.lock().await.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
