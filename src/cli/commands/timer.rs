//! Timer control commands.
//!
//! The countdown only moves while `jornada run` is open; these commands change
//! the saved state and report where the timer stands.

use colored::Colorize;

use super::{render_status, Context, Engine};
use crate::cli::args::OutputFormat;
use crate::error::JornadaError;
use crate::focus::format_seconds_as_timer;

/// Execute start command
///
/// # Errors
///
/// Returns an error if a jornada is already running or the plan is empty.
pub fn start(ctx: &Context) -> Result<String, JornadaError> {
    control(ctx, |engine| engine.start().map(|_| ()), |engine| {
        let count = engine.sessions().len();
        format!("Started a jornada of {count} sessions")
    })
}

/// Execute pause command
///
/// # Errors
///
/// Returns an error unless a jornada is running.
pub fn pause(ctx: &Context) -> Result<String, JornadaError> {
    control(ctx, |engine| engine.pause().map(|_| ()), |_| "Paused".to_string())
}

/// Execute resume command
///
/// # Errors
///
/// Returns an error unless a jornada is running.
pub fn resume(ctx: &Context) -> Result<String, JornadaError> {
    control(ctx, |engine| engine.resume().map(|_| ()), |_| "Resumed".to_string())
}

/// Execute skip command
///
/// # Errors
///
/// Returns an error unless a jornada is running.
pub fn skip(ctx: &Context) -> Result<String, JornadaError> {
    control(ctx, |engine| engine.skip_forward().map(|_| ()), moved_to)
}

/// Execute back command
///
/// # Errors
///
/// Returns an error unless a jornada is running.
pub fn back(ctx: &Context) -> Result<String, JornadaError> {
    control(ctx, |engine| engine.skip_back().map(|_| ()), moved_to)
}

/// Execute stop command
///
/// # Errors
///
/// Returns an error if the engine cannot be opened.
pub fn stop(ctx: &Context) -> Result<String, JornadaError> {
    control(
        ctx,
        |engine| {
            engine.stop();
            Ok(())
        },
        |_| "Stopped. Back to setup".to_string(),
    )
}

/// Execute status command
///
/// # Errors
///
/// Returns an error if the engine cannot be opened.
pub fn status(ctx: &Context) -> Result<String, JornadaError> {
    let engine = ctx.open_engine()?;
    render_status(&engine, &ctx.known_items(), ctx.format)
}

/// Open the engine, apply one action and report the resulting status.
fn control<A, M>(ctx: &Context, action: A, message: M) -> Result<String, JornadaError>
where
    A: FnOnce(&mut Engine) -> Result<(), JornadaError>,
    M: FnOnce(&Engine) -> String,
{
    let mut engine = ctx.open_engine()?;
    action(&mut engine)?;

    let status = render_status(&engine, &ctx.known_items(), ctx.format)?;
    match ctx.format {
        OutputFormat::Json => Ok(status),
        OutputFormat::Pretty => {
            // The status block already carries the degraded warning.
            let headline = message(&engine);
            if engine.persistence().is_durable() {
                Ok(format!("{}\n\n{status}", headline.green()))
            } else {
                Ok(format!("{}\n\n{status}", headline.yellow()))
            }
        }
    }
}

fn moved_to(engine: &Engine) -> String {
    engine.current_session().map_or_else(
        || "Jornada complete".to_string(),
        |session| {
            format!(
                "Now on {} ({})",
                session.label,
                format_seconds_as_timer(engine.remaining_seconds())
            )
        },
    )
}
