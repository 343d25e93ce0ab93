//! TUI views and rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};

use super::state::{AppState, FormField, InteractionMode, StatusKind};

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    let form_height = if state.mode == InteractionMode::Form { 6 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Header
            Constraint::Length(form_height), // New-todo form
            Constraint::Min(0),              // Todo list
            Constraint::Length(3),           // Status / key hints
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    if state.mode == InteractionMode::Form {
        render_form(state, frame, chunks[1]);
    }
    render_todos(state, frame, chunks[2]);
    render_footer(state, frame, chunks[3]);

    if state.mode == InteractionMode::Help {
        render_help_overlay(frame, chunks[2]);
    }
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let pending = state.todos.iter().filter(|t| !t.completed).count();
    let mut spans = vec![
        Span::styled(
            "Todo Summary Assistant ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(format!("{} todos", state.todos.len()), Style::default().fg(Color::Yellow)),
        Span::raw(" │ "),
        Span::styled(format!("{} pending", pending), Style::default().fg(Color::Green)),
        Span::raw(" │ "),
        Span::styled(state.api_url.clone(), Style::default().fg(Color::DarkGray)),
    ];
    if state.busy {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("Summarizing...", Style::default().fg(Color::Magenta)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_form(state: &AppState, frame: &mut Frame, area: Rect) {
    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if focused { "▏" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<13}", label), style),
            Span::raw(value.to_string()),
            Span::styled(cursor, style),
        ])
    };

    let lines = vec![
        field("Title*", &state.form.title, state.form.focus == FormField::Title),
        field("Description", &state.form.description, state.form.focus == FormField::Description),
        Line::default(),
        Line::from(Span::styled(
            "Enter add · Tab switch field · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Add New Todo "));
    frame.render_widget(form, area);
}

fn render_todos(state: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Todo List ");

    if state.todos.is_empty() {
        let empty = Paragraph::new("No todos yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows = state.todos.iter().map(|todo| {
        Row::new(vec![
            Cell::from(todo.id.to_string()),
            Cell::from(todo.title.clone()),
            Cell::from(todo.description_text().unwrap_or("").to_string()),
            Cell::from(todo.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(35),
            Constraint::Percentage(45),
            Constraint::Length(16),
        ],
    )
    .header(Row::new(vec!["ID", "Title", "Description", "Created"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ")
    .block(block);

    let mut table_state = TableState::default().with_selected(Some(state.selection.selected_index));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let line = match &state.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Success => Color::Green,
                StatusKind::Error => Color::Red,
            };
            Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            "a add · d delete · s summarize · r refresh · j/k move · ? help · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(44);
    let height = area.height.min(13);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let keys = [
        ("j / ↓", "next todo"),
        ("k / ↑", "previous todo"),
        ("a", "add a todo"),
        ("Tab", "switch form field"),
        ("Enter", "submit form"),
        ("Esc", "cancel form"),
        ("d", "delete selected todo"),
        ("s", "summarize and send to Slack"),
        ("r", "refresh"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<8}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*desc),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help ")),
        popup,
    );
}
