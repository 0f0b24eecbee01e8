use std::{
    io::{self, BufRead, Write},
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::HttpUserDirectory;
use crossbeam_channel::{bounded, select, tick, unbounded, Receiver};
use dashboard_core::{
    backend_bridge::runtime, controller::events::UiEvent, state::DEFAULT_PAGE_SIZE,
    DashboardController, ViewModel,
};
use tracing_subscriber::EnvFilter;

mod intent;
mod render;

use intent::{apply_intent, parse_intent, Outcome, HELP};
use render::render_view;

const TICK_INTERVAL: Duration = Duration::from_millis(250);
const COMMAND_QUEUE_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "DASHBOARD_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server_url: String,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

enum Step {
    Input(String),
    Backend(UiEvent),
    Tick,
    InputClosed,
    BackendGone,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let directory = Arc::new(HttpUserDirectory::new(&args.server_url)?);
    tracing::info!(server_url = directory.server_url(), "starting dashboard");

    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = unbounded();
    let worker =
        runtime::launch(directory, cmd_rx, ui_tx).context("failed to start backend worker")?;
    let input_rx = spawn_stdin_reader().context("failed to start input reader")?;
    let ticker = tick(TICK_INTERVAL);

    let mut controller = DashboardController::with_page_size(cmd_tx, args.page_size);
    controller.mount();

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "type 'help' for commands")?;
    let mut last_frame: Option<ViewModel> = None;

    loop {
        let vm = controller.view_model();
        if last_frame.as_ref() != Some(&vm) {
            write!(stdout, "\n{}> ", render_view(&vm))?;
            stdout.flush()?;
            last_frame = Some(vm);
        }

        let step = select! {
            recv(input_rx) -> line => line.map_or(Step::InputClosed, Step::Input),
            recv(ui_rx) -> event => event.map_or(Step::BackendGone, Step::Backend),
            recv(ticker) -> _ => Step::Tick,
        };

        let now = Instant::now();
        match step {
            Step::Input(line) => match parse_intent(&line) {
                Ok(None) => {}
                Ok(Some(intent)) => match apply_intent(&mut controller, intent, now) {
                    Outcome::Continue => {}
                    Outcome::ShowHelp => {
                        writeln!(stdout, "{HELP}")?;
                        last_frame = None;
                    }
                    Outcome::Notice(text) => {
                        writeln!(stdout, "{text}")?;
                        last_frame = None;
                    }
                    Outcome::Quit => break,
                },
                Err(err) => {
                    writeln!(stdout, "{err}")?;
                    last_frame = None;
                }
            },
            Step::Backend(event) => controller.apply(event, now),
            Step::Tick => {
                controller.tick(now);
            }
            Step::InputClosed => break,
            Step::BackendGone => {
                tracing::error!("backend worker stopped unexpectedly");
                break;
            }
        }
    }

    drop(controller);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    Ok(())
}

fn spawn_stdin_reader() -> io::Result<Receiver<String>> {
    let (line_tx, line_rx) = unbounded();
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    tracing::warn!("stdin read failed; stopping input");
                    break;
                };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(line_rx)
}
