use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use search_core::{update, AppState, Msg, SearchTypeSelection};
use search_logging::{search_debug, search_info};

use crate::cli::CliArgs;
use crate::config;
use crate::effects::EffectRunner;
use crate::input::{self, HELP};
use crate::render::render;

/// Everything the main loop reacts to.
pub(crate) enum AppEvent {
    Msg(Msg),
    /// Text for the user that does not go through the state machine.
    Notice(String),
    Quit,
}

pub(crate) fn run(args: CliArgs) -> anyhow::Result<()> {
    let file_config = config::load(&args.config);
    let settings = config::resolve(&args, file_config);
    search_info!(
        "Starting search client server={} type={}",
        settings.client.base_url,
        settings.search_type
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(settings.client, event_tx.clone())
        .context("failed to start the search engine")?;
    let mut session = Session {
        state: AppState::with_search_type(SearchTypeSelection::from_input(&settings.search_type)),
        runner,
        finished_at: None,
    };

    let one_shot = args.query.is_some();
    match args.query {
        Some(query) => {
            let _ = event_tx.send(AppEvent::Msg(Msg::QueryChanged(query)));
            let _ = event_tx.send(AppEvent::Msg(Msg::SearchRequested));
        }
        None => {
            println!("{HELP}");
            session.print();
            spawn_stdin_reader(event_tx.clone());
        }
    }
    drop(event_tx);

    let mut triggered = false;
    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => {
                triggered |= msg == Msg::SearchRequested;
                session.dispatch(msg);
            }
            AppEvent::Notice(text) => println!("{text}"),
            AppEvent::Quit => break,
        }

        if one_shot && triggered && session.state.active_request().is_none() {
            let view = session.state.view();
            if let Some(message) = view.validation_message {
                bail!(message);
            }
            if view.results.error_message().is_some() {
                bail!("search failed");
            }
            break;
        }
    }

    search_debug!("Main loop finished");
    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    finished_at: Option<DateTime<Local>>,
}

impl Session {
    /// Applies a message plus the follow-ups its effects produce, then renders once.
    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let was_active = self.state.active_request().is_some();
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            if was_active && self.state.active_request().is_none() {
                self.finished_at = Some(Local::now());
            }
            inbox.extend(self.runner.run(effects));
        }

        if self.state.consume_dirty() {
            self.print();
        }
    }

    fn print(&self) {
        let frame = render(&self.state.view(), self.finished_at);
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{frame}");
        let _ = stdout.flush();
    }
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            for event in input::into_events(input::parse_line(&line)) {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}
