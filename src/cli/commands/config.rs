//! Plan configuration commands.

use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::error::JornadaError;
use crate::focus::{parse_minutes, Persistence, PlanConfig};
use crate::output::format_config;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if a value does not parse, the resulting configuration
/// is invalid, or the engine cannot be opened.
pub fn config(ctx: &Context, cmd: ConfigCommands) -> Result<String, JornadaError> {
    let mut engine = ctx.open_engine()?;

    match cmd {
        ConfigCommands::Show => format_config(engine.config(), ctx.format),

        ConfigCommands::Set {
            total,
            focus,
            short,
            long,
            interval,
        } => {
            let mut config = *engine.config();
            apply_minutes(&mut config.total_duration_minutes, total.as_deref(), "total")?;
            apply_minutes(&mut config.focus_minutes, focus.as_deref(), "focus")?;
            apply_minutes(&mut config.short_break_minutes, short.as_deref(), "short")?;
            apply_minutes(&mut config.long_break_minutes, long.as_deref(), "long")?;
            if let Some(interval) = interval {
                config.long_break_interval = interval;
            }

            let persistence = engine.update_configuration(config)?;
            updated(engine.config(), &persistence, "Configuration updated", ctx.format)
        }

        ConfigCommands::Reset => {
            let defaults = ctx.settings.plan.to_config()?;
            let persistence = engine.update_configuration(defaults)?;
            updated(engine.config(), &persistence, "Configuration reset", ctx.format)
        }
    }
}

fn apply_minutes(field: &mut u32, value: Option<&str>, flag: &str) -> Result<(), JornadaError> {
    if let Some(value) = value {
        *field = parse_minutes(value).ok_or_else(|| {
            JornadaError::Parse(format!(
                "--{flag}: invalid duration '{value}'. Use minutes (25) or units (1h30m)"
            ))
        })?;
    }
    Ok(())
}

fn updated(
    config: &PlanConfig,
    persistence: &Persistence,
    message: &str,
    format: OutputFormat,
) -> Result<String, JornadaError> {
    let shown = format_config(config, format)?;
    match (format, persistence) {
        (OutputFormat::Json, _) => Ok(shown),
        (OutputFormat::Pretty, Persistence::Durable) => {
            Ok(format!("{}\n\n{shown}", message.green()))
        }
        (OutputFormat::Pretty, Persistence::Degraded { reason }) => Ok(format!(
            "{}\n\n{shown}\n{} {reason}",
            message.green(),
            "warning:".yellow().bold()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_minutes_parses_units() {
        let mut field = 25;
        apply_minutes(&mut field, Some("1h30m"), "total").unwrap();
        assert_eq!(field, 90);
    }

    #[test]
    fn test_apply_minutes_none_keeps_value() {
        let mut field = 25;
        apply_minutes(&mut field, None, "focus").unwrap();
        assert_eq!(field, 25);
    }

    #[test]
    fn test_apply_minutes_rejects_garbage() {
        let mut field = 25;
        let err = apply_minutes(&mut field, Some("soon"), "focus").unwrap_err();
        assert!(matches!(err, JornadaError::Parse(_)));
        assert!(err.to_string().contains("--focus"));
        assert_eq!(field, 25);
    }
}
