use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use jornada::cli::args::{Cli, Commands};
use jornada::cli::commands::{self, Context};
use jornada::config::{Paths, Settings};
use jornada::error::JornadaError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        let code = e.downcast_ref::<JornadaError>().map_or(1, JornadaError::exit_code);
        std::process::exit(code);
    }
}

/// Log to stderr so stdout stays clean for `--output json`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "jornada=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let paths = Paths::new()?;
    let settings = Settings::load(&paths)
        .with_context(|| format!("loading {}", paths.config_file.display()))?;
    settings.general.color.apply();

    let format = cli.output.unwrap_or(settings.general.default_output);
    tracing::debug!(root = %paths.root.display(), ?format, "starting");
    let ctx = Context::new(paths, settings, format);

    let output = match cli.command {
        Commands::Plan { task } => commands::plan(&ctx, &task)?,
        Commands::Config(args) => commands::config(&ctx, args.command)?,
        Commands::Tasks(args) => commands::tasks(&ctx, args.command)?,
        Commands::Start => commands::start(&ctx)?,
        Commands::Pause => commands::pause(&ctx)?,
        Commands::Resume => commands::resume(&ctx)?,
        Commands::Skip => commands::skip(&ctx)?,
        Commands::Back => commands::back(&ctx)?,
        Commands::Stop => commands::stop(&ctx)?,
        Commands::Status => commands::status(&ctx)?,
        Commands::Run => {
            jornada::tui::run(&ctx)?;
            String::new()
        }
        Commands::Completions { shell, install } => commands::completions(&shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
