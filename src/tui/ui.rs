//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::focus::{
    format_minutes_as_hours_minutes, format_seconds_as_timer, EngineState, Phase, PlanConfig,
    SessionKind,
};
use crate::storage::KeyValueStore;
use crate::tui::app::App;

fn kind_color(kind: SessionKind) -> Color {
    match kind {
        SessionKind::Focus => Color::Red,
        SessionKind::ShortBreak => Color::Green,
        SessionKind::LongBreak => Color::Cyan,
    }
}

/// Render the application UI.
pub fn render<S, C>(frame: &mut Frame<'_>, app: &App<S, C>)
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    // Header, countdown, session list, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_countdown(frame, app, chunks[1]);
    render_sessions(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect)
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    let engine = app.engine();
    let summary = engine.plan_summary();
    let title = match engine.phase() {
        Phase::Setup => format!(" jornada · setup · {} ", summary.describe()),
        Phase::Active => format!(
            " jornada · session {}/{}{} ",
            engine.current_index() + 1,
            engine.sessions().len(),
            if engine.is_paused() { " · paused" } else { "" }
        ),
        Phase::Completed => format!(" jornada · complete · {} ", summary.describe()),
    };

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

fn render_countdown<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect)
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    let engine = app.engine();

    let (label, color, detail) = match (engine.phase(), engine.current_session()) {
        (Phase::Active, Some(session)) => (
            format!(
                "{}  {}",
                session.label,
                format_seconds_as_timer(engine.remaining_seconds())
            ),
            if engine.is_paused() {
                Color::Yellow
            } else {
                kind_color(session.kind)
            },
            session
                .work_item_id
                .as_deref()
                .map(|id| app.title_for(id).to_string()),
        ),
        (Phase::Completed, _) => ("Done".to_string(), Color::Green, None),
        _ => (
            "Ready".to_string(),
            Color::Gray,
            Some("press s to start".to_string()),
        ),
    };

    let title = detail.map_or_else(String::new, |d| format!(" {d} "));
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .ratio(engine.progress().clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

fn render_sessions<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect)
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    let engine = app.engine();
    let sessions = app.sessions();
    let current = match engine.phase() {
        Phase::Active => Some(engine.current_index()),
        Phase::Setup | Phase::Completed => None,
    };

    let items: Vec<ListItem<'_>> = sessions
        .iter()
        .map(|session| {
            let done = engine.phase() == Phase::Completed
                || current.is_some_and(|index| session.index < index);
            let style = if done {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(
                    if session.kind.is_break() { "○ " } else { "● " },
                    Style::default().fg(kind_color(session.kind)),
                ),
                Span::styled(format!("{:<12}", session.label), style),
                Span::styled(
                    format!(
                        "{:>6}",
                        format_minutes_as_hours_minutes(session.duration_minutes)
                    ),
                    style,
                ),
            ];
            if let Some(id) = session.work_item_id.as_deref() {
                spans.push(Span::styled(
                    format!("  {}", app.title_for(id)),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = match engine.phase() {
        Phase::Setup => " Plan preview ",
        Phase::Active | Phase::Completed => " Sessions ",
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(current);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect)
where
    S: KeyValueStore<EngineState>,
    C: KeyValueStore<PlanConfig>,
{
    let (text, style) = if app.engine().persistence().is_durable() {
        (
            app.status.clone().unwrap_or_default(),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    } else {
        (
            "State is not being saved. Progress will be lost on exit".to_string(),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    };

    frame.render_widget(Paragraph::new(format!(" {text}")).style(style), area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::focus::TimerEngine;
    use crate::storage::MemoryStore;
    use crate::tasks::{WorkItem, WorkItemStatus};
    use crate::tui::event::Action;

    fn app() -> App<MemoryStore<EngineState>, MemoryStore<PlanConfig>> {
        let config = PlanConfig {
            total_duration_minutes: 70,
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 2,
        };
        let mut engine =
            TimerEngine::open_with_defaults(MemoryStore::new(), MemoryStore::new(), config)
                .with_tick_interval(Duration::from_secs(1));
        engine.set_work_items(vec!["a".to_string()]);
        let items = vec![WorkItem {
            id: "a".to_string(),
            title: "Write report".to_string(),
            status: WorkItemStatus::Open,
        }];
        App::new(engine, items, false)
    }

    fn rendered(app: &App<MemoryStore<EngineState>, MemoryStore<PlanConfig>>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_setup_preview() {
        let screen = rendered(&app());
        assert!(screen.contains("Plan preview"));
        assert!(screen.contains("Focus #1"));
        assert!(screen.contains("Write report"));
        assert!(screen.contains("Ready"));
    }

    #[test]
    fn test_render_active_countdown() {
        let mut app = app();
        app.apply(Action::Start);
        let screen = rendered(&app);
        assert!(screen.contains("25:00"));
        assert!(screen.contains("session 1/4"));
    }
}
