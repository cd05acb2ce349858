use colored::Colorize;

use super::StatusView;
use crate::focus::{
    format_minutes_as_hours_minutes, format_seconds_as_timer, render_progress_bar, Persistence,
    Phase, PlanConfig, PlanSummary, Session, SessionKind,
};
use crate::tasks::{title_for, WorkItem, WorkItemStatus};

fn session_icon(kind: SessionKind) -> colored::ColoredString {
    match kind {
        SessionKind::Focus => "●".red(),
        SessionKind::ShortBreak => "○".green(),
        SessionKind::LongBreak => "◎".cyan(),
    }
}

fn session_line(session: &Session, items: &[WorkItem]) -> String {
    let mut line = format!(
        "{:>3}. {} {:<12} {:>4}",
        session.index + 1,
        session_icon(session.kind),
        session.label,
        format_minutes_as_hours_minutes(session.duration_minutes),
    );

    if let Some(id) = &session.work_item_id {
        line.push_str(&format!("  {}", title_for(items, id).dimmed()));
    }

    line
}

/// Format a plan preview as a session list with a summary footer.
pub fn format_plan_pretty(
    sessions: &[Session],
    summary: &PlanSummary,
    config: &PlanConfig,
    items: &[WorkItem],
) -> String {
    let header = format!(
        "Plan for {} ({} focus, {}/{} breaks, long every {})",
        format_minutes_as_hours_minutes(config.total_duration_minutes),
        format_minutes_as_hours_minutes(config.focus_minutes),
        format_minutes_as_hours_minutes(config.short_break_minutes),
        format_minutes_as_hours_minutes(config.long_break_minutes),
        config.long_break_interval,
    );

    if sessions.is_empty() {
        return format!(
            "{}\n  {}",
            header.bold(),
            "No focus session fits in this jornada".yellow()
        );
    }

    let mut lines = vec![header.bold().to_string(), "─".repeat(50)];
    lines.extend(sessions.iter().map(|s| session_line(s, items)));
    lines.push("─".repeat(50));
    lines.push(format!(
        "{} {}",
        summary.describe(),
        format!("= {}", format_minutes_as_hours_minutes(summary.total_minutes)).dimmed()
    ));

    lines.join("\n")
}

/// Format the plan configuration.
pub fn format_config_pretty(config: &PlanConfig) -> String {
    let rows = [
        (
            "Total",
            format_minutes_as_hours_minutes(config.total_duration_minutes),
        ),
        ("Focus", format_minutes_as_hours_minutes(config.focus_minutes)),
        (
            "Short break",
            format_minutes_as_hours_minutes(config.short_break_minutes),
        ),
        (
            "Long break",
            format_minutes_as_hours_minutes(config.long_break_minutes),
        ),
        (
            "Long break every",
            format!("{} focus sessions", config.long_break_interval),
        ),
    ];

    let mut lines = vec!["Plan configuration".bold().to_string(), "─".repeat(40)];
    for (name, value) in rows {
        lines.push(format!("  {:<18} {}", format!("{name}:").dimmed(), value));
    }
    lines.join("\n")
}

/// Format a list of work items
pub fn format_work_items_pretty(items: &[WorkItem], title: &str) -> String {
    if items.is_empty() {
        return format!("{title} (0 items)\n  No items");
    }

    let mut output = format!("{} ({} items)\n", title, items.len());
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for item in items {
        let status_icon = match item.status {
            WorkItemStatus::Open => "[ ]".white(),
            WorkItemStatus::Completed => "[x]".green(),
            WorkItemStatus::Canceled => "[-]".red(),
        };

        let title = match item.status {
            WorkItemStatus::Canceled => item.title.strikethrough().to_string(),
            _ => item.title.clone(),
        };

        output.push_str(&format!(
            "{} {}  {}\n",
            status_icon,
            title.bold(),
            item.id.dimmed()
        ));
    }

    output
}

/// Format the queued work items, resolving titles where the provider knows them.
pub fn format_queue_pretty(ids: &[String], items: &[WorkItem]) -> String {
    if ids.is_empty() {
        return format!(
            "Queue (0 items)\n  {}",
            "Focus sessions will have no work item assigned".dimmed()
        );
    }

    let mut lines = vec![format!("Queue ({} items)", ids.len()), "─".repeat(50)];
    for (position, id) in ids.iter().enumerate() {
        let title = title_for(items, id);
        if title == id {
            lines.push(format!("{:>3}. {}", position + 1, id.bold()));
        } else {
            lines.push(format!("{:>3}. {}  {}", position + 1, title.bold(), id.dimmed()));
        }
    }
    lines.join("\n")
}

/// Format the timer status.
pub fn format_status_pretty(view: &StatusView<'_>) -> String {
    let mut lines = Vec::new();

    match (view.phase, view.current_session) {
        (Phase::Active, Some(session)) => {
            let state = if view.is_paused {
                "PAUSED".yellow().bold()
            } else {
                "RUNNING".green().bold()
            };
            lines.push(format!(
                "{} {}  {}  ({}/{})",
                session_icon(session.kind),
                session.label.bold(),
                state,
                view.current_index + 1,
                view.session_count,
            ));
            lines.push("─".repeat(40));
            lines.push(format!(
                "  {} remaining  {}",
                format_seconds_as_timer(view.remaining_seconds).bold(),
                render_progress_bar(view.progress, 20)
            ));
            if let Some(title) = view.current_work_item {
                lines.push(format!("  {}: {}", "Working on".dimmed(), title));
            }
            if let Some(started) = view.started_at {
                lines.push(format!(
                    "  {}: {}",
                    "Started".dimmed(),
                    started.format("%Y-%m-%d %H:%M UTC")
                ));
            }
        }
        (Phase::Completed, _) => {
            lines.push("Jornada complete".green().bold().to_string());
            lines.push("─".repeat(40));
            lines.push(format!("  {}", view.summary.describe()));
        }
        _ => {
            lines.push("Not started".bold().to_string());
            lines.push("─".repeat(40));
            lines.push(format!("  {}: {}", "Next plan".dimmed(), view.summary.describe()));
        }
    }

    if let Persistence::Degraded { reason } = view.persistence {
        lines.push(format!("{} state not saved: {}", "warning:".yellow().bold(), reason));
    }

    lines.join("\n")
}
