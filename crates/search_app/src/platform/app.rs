use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use log::LevelFilter;
use search_core::{update, AppState, Msg};
use search_engine::EngineHandle;
use search_logging::{search_error, search_info, search_warn};

use super::config::{config_path, read_config, SearchBarConfig};
use super::effects::EffectRunner;
use super::navigation::HistoryNavigator;
use super::results::SharedResults;
use super::ui::input::{parse_command, Command, HELP};
use super::ui::render::render;

pub fn run_app() -> anyhow::Result<()> {
    let path = config_path();
    let loaded = read_config(&path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => SearchBarConfig::default(),
    };

    search_logging::initialize(config.log_destination, LevelFilter::Info);
    match loaded {
        Ok(Some(_)) => search_info!("Loaded config from {:?}", path),
        Ok(None) => search_info!("No config at {:?}; using defaults", path),
        Err(err) => search_warn!("{}; using defaults", err),
    }

    let engine = EngineHandle::new(config.service_settings()).context("starting search engine")?;
    let navigator = HistoryNavigator::default();
    let results = SharedResults::default();
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

    let mut runner = EffectRunner::new(
        engine,
        Box::new(navigator.clone()),
        Box::new(results.clone()),
        msg_tx.clone(),
    );

    spawn_input_reader(msg_tx);

    let mut stdout = io::stdout();
    writeln!(stdout, "{HELP}")?;
    let mut state = AppState::new();
    draw(&mut stdout, &state, &navigator, &results)?;

    // The input reader sends `Unmounted` on quit or end of input.
    for msg in msg_rx {
        let unmounting = matches!(msg, Msg::Unmounted);
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if state.consume_dirty() {
            draw(&mut stdout, &state, &navigator, &results)?;
        }
        if unmounting {
            break;
        }
    }

    search_info!("Search bar closed");
    Ok(())
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    search_error!("Failed to read input: {}", err);
                    break;
                }
            };
            match parse_command(&line) {
                Some(Command::Dispatch(msg)) => {
                    if msg_tx.send(msg).is_err() {
                        return;
                    }
                }
                Some(Command::Quit) => break,
                Some(Command::Help) | None => println!("{HELP}"),
            }
        }
        let _ = msg_tx.send(Msg::Unmounted);
    });
}

fn draw(
    out: &mut impl Write,
    state: &AppState,
    navigator: &HistoryNavigator,
    results: &SharedResults,
) -> io::Result<()> {
    let location = navigator.current();
    let snapshot = results.snapshot();
    for line in render(&state.view(), location.as_deref(), &snapshot) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
