use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "jornada")]
#[command(about = "Plan a work period into focus sessions and run the timer")]
#[command(long_about = "jornada - focus-session planner and resumable Pomodoro timer

Splits a work period (a jornada) into focus sessions and breaks, spreads
your queued work items over the focus sessions, and runs a countdown that
survives restarts. Every change is saved, so you can stop the interactive
timer, close the terminal, and pick up later where you left off.

QUICK START:
  jornada config set --total 180      Plan a three-hour jornada
  jornada tasks add t-42              Queue a work item
  jornada plan                        Preview sessions and breaks
  jornada start                       Freeze the plan and start
  jornada run                         Interactive countdown

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to the `general.default_output` setting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log engine activity to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Preview the plan for the current configuration
    ///
    /// Shows the sessions `jornada start` would create, with the queued work
    /// items assigned round-robin to focus sessions. Nothing is saved.
    ///
    /// # Examples
    ///
    ///   jornada plan                  Preview with queued work items
    ///   jornada plan --task a --task b   Preview with other work items
    #[command(alias = "p")]
    Plan {
        /// Work item ids to preview with instead of the queue
        #[arg(long, short = 't')]
        task: Vec<String>,
    },

    /// Show or change the plan configuration
    Config(ConfigArgs),

    /// Manage the work items queued for the next jornada
    Tasks(TasksArgs),

    /// Freeze the plan and start the first session
    Start,

    /// Pause the countdown
    Pause,

    /// Resume a paused countdown
    Resume,

    /// Skip to the next session
    #[command(alias = "next")]
    Skip,

    /// Restart the previous session
    #[command(alias = "prev")]
    Back,

    /// Abandon the jornada and return to setup
    Stop,

    /// Show the timer state
    #[command(alias = "s")]
    Status,

    /// Run the interactive countdown
    ///
    /// Keys: space pause/resume, n next, b back, s start, x stop, q quit.
    Run,

    /// Generate shell completions
    Completions {
        /// Shell (bash, zsh, fish, powershell, elvish)
        shell: String,

        /// Show installation instructions instead
        #[arg(long)]
        install: bool,
    },
}

/// Arguments for plan configuration.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current plan configuration
    Show,

    /// Change one or more fields
    ///
    /// Durations accept minutes ("90") or units ("1h30m").
    ///
    /// Examples:
    ///   jornada config set --total 3h
    ///   jornada config set --focus 50 --short 10 --interval 3
    Set {
        /// Total length of the jornada
        #[arg(long)]
        total: Option<String>,

        /// Focus session length
        #[arg(long)]
        focus: Option<String>,

        /// Short break length
        #[arg(long)]
        short: Option<String>,

        /// Long break length
        #[arg(long)]
        long: Option<String>,

        /// Number of focus sessions before a long break
        #[arg(long)]
        interval: Option<u32>,
    },

    /// Restore the configured defaults
    Reset,
}

/// Arguments for the work-item queue.
#[derive(Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommands,
}

/// Work-item queue subcommands.
#[derive(Subcommand)]
pub enum TasksCommands {
    /// List open work items that can be queued
    Available,

    /// List the queued work items
    #[command(alias = "ls")]
    List,

    /// Queue a work item
    Add {
        /// Work item id
        id: String,
    },

    /// Remove a work item from the queue
    #[command(alias = "rm")]
    Remove {
        /// Work item id
        id: String,
    },

    /// Replace the queue
    Set {
        /// Work item ids, in order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Empty the queue
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_plan_default() {
        let cli = Cli::try_parse_from(["jornada", "plan"]).unwrap();
        if let Commands::Plan { task } = cli.command {
            assert!(task.is_empty());
        } else {
            panic!("Expected Plan command");
        }
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_plan_with_tasks() {
        let cli = Cli::try_parse_from(["jornada", "plan", "-t", "a", "--task", "b"]).unwrap();
        if let Commands::Plan { task } = cli.command {
            assert_eq!(task, vec!["a".to_string(), "b".to_string()]);
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_config_set() {
        let cli = Cli::try_parse_from([
            "jornada", "config", "set", "--total", "3h", "--interval", "2",
        ])
        .unwrap();
        if let Commands::Config(args) = cli.command {
            if let ConfigCommands::Set {
                total, interval, focus, ..
            } = args.command
            {
                assert_eq!(total.as_deref(), Some("3h"));
                assert_eq!(interval, Some(2));
                assert!(focus.is_none());
            } else {
                panic!("Expected Set subcommand");
            }
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_tasks_set_requires_ids() {
        assert!(Cli::try_parse_from(["jornada", "tasks", "set"]).is_err());

        let cli = Cli::try_parse_from(["jornada", "tasks", "set", "a", "b"]).unwrap();
        if let Commands::Tasks(args) = cli.command {
            assert!(matches!(args.command, TasksCommands::Set { ref ids } if ids.len() == 2));
        } else {
            panic!("Expected Tasks command");
        }
    }

    #[test]
    fn test_cli_timer_aliases() {
        let cli = Cli::try_parse_from(["jornada", "next"]).unwrap();
        assert!(matches!(cli.command, Commands::Skip));

        let cli = Cli::try_parse_from(["jornada", "prev"]).unwrap();
        assert!(matches!(cli.command, Commands::Back));
    }

    #[test]
    fn test_cli_global_output() {
        let cli = Cli::try_parse_from(["jornada", "status", "--output", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Pretty));
    }
}
