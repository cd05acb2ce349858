//! Terminal User Interface (TUI) for jornada.
//!
//! Runs the countdown interactively. The loop waits for input until the next
//! tick is due, then pumps the engine and picks up changes made by other
//! jornada processes. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;
pub use event::{action_for_key, Action};

use std::io::{self, Write};
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::cli::commands::Context;
use crate::error::JornadaError;
use crate::focus::{EngineState, PlanConfig};
use crate::storage::KeyValueStore;

/// Run the interactive timer.
///
/// # Errors
///
/// Returns an error if the engine cannot be opened or the terminal fails.
pub fn run(ctx: &Context) -> Result<(), JornadaError> {
    let engine = ctx.open_engine()?;
    let mut app = App::new(engine, ctx.known_items(), ctx.settings.timer.bell);

    // Setup terminal
    enable_raw_mode().map_err(|e| JornadaError::Config(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| JornadaError::Config(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| JornadaError::Config(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B, S, C>(terminal: &mut Terminal<B>, app: &mut App<S, C>) -> Result<(), JornadaError>
where
    B: Backend,
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| JornadaError::Config(format!("Failed to draw: {e}")))?;

        let timeout = app.poll_timeout(Instant::now());
        match event::handle_events(app, timeout)? {
            Some(Action::Quit) => break,
            Some(action) => app.apply(action),
            None => {}
        }

        app.on_tick(Instant::now());
        if app.take_bell() {
            ring_bell();
        }
    }

    Ok(())
}

fn ring_bell() {
    let mut stdout = io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
        tracing::debug!(error = %e, "could not ring the bell");
    }
}
