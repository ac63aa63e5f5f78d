use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::{Mode, TuiApp};
use crate::constants::{EXAMPLE_QUESTIONS, UI_SIDEBAR_WIDTH, UI_TABLE_PREVIEW_ROWS};
use crate::gateway::DataRow;
use crate::session::{Message, Role};

/// Render the whole chat screen
pub fn render_ui(f: &mut Frame, app: &TuiApp) {
    let area = f.area();

    let (sidebar_area, main_area) = if app.show_sidebar {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(UI_SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, area)
    };

    if let Some(sidebar_area) = sidebar_area {
        render_sidebar(f, app, sidebar_area);
    }

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
    if app.show_examples() {
        constraints.push(Constraint::Length(EXAMPLE_QUESTIONS.len() as u16 + 2));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(main_area);

    render_header(f, app, chunks[0]);
    render_messages(f, app, chunks[1]);
    if app.show_examples() {
        render_examples(f, chunks[2]);
    }
    render_input(f, app, *chunks.last().expect("layout has input area"));
}

fn render_sidebar(f: &mut Frame, app: &TuiApp, area: Rect) {
    let items: Vec<ListItem> = app
        .controller
        .store()
        .sessions()
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let mut style = if i == app.sidebar_selected && app.mode == Mode::Normal {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            if session.id == app.controller.current_id() {
                style = style.add_modifier(Modifier::BOLD);
            }

            let lines = vec![
                Line::from(Span::styled(session.title(), style)),
                Line::from(Span::styled(
                    format!(
                        "  {} | {} messages",
                        session.created_at.format("%Y-%m-%d %H:%M"),
                        session.messages.len()
                    ),
                    style.fg(Color::Gray),
                )),
            ];
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Chats (n: new, d: delete) "),
    );
    f.render_widget(list, area);
}

fn render_header(f: &mut Frame, app: &TuiApp, area: Rect) {
    let stats_line = match app.controller.stats() {
        Some(stats) => format!(
            "{} records | {} departments | {} suppliers",
            stats.total_records, stats.departments, stats.suppliers
        ),
        None => "stats unavailable".to_string(),
    };

    let header = Paragraph::new(stats_line)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Procura - Procurement Assistant "),
        );
    f.render_widget(header, area);
}

fn render_messages(f: &mut Frame, app: &TuiApp, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for message in &app.controller.current_session().messages {
        lines.extend(message_lines(message));
        lines.push(Line::default());
    }

    if app.controller.is_loading() {
        lines.push(Line::from(Span::styled(
            "Assistant is typing...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    // Scroll is measured from the bottom of the transcript
    let viewport = area.height.saturating_sub(2);
    let total = lines.len() as u16;
    let max_offset = total.saturating_sub(viewport);
    let offset = max_offset.saturating_sub(app.scroll_offset.min(max_offset));

    let messages = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0))
        .block(Block::default().borders(Borders::ALL).title(" Conversation "));
    f.render_widget(messages, area);
}

/// Lines for one message: role tag, content, optional table preview,
/// optional generated query
fn message_lines(message: &Message) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    let (tag, tag_style) = match message.role {
        Role::User => ("[You]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Role::Assistant if message.is_error => {
            ("[Assistant]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        }
        Role::Assistant => {
            ("[Assistant]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        }
    };
    lines.push(Line::from(Span::styled(tag, tag_style)));

    let content_style = if message.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    for text in message.content.lines() {
        lines.push(Line::from(Span::styled(text, content_style)));
    }

    if let Some(data) = &message.data {
        for text in table_preview(data) {
            lines.push(Line::from(Span::styled(text, Style::default().fg(Color::Yellow))));
        }
    }

    if let Some(query) = &message.query {
        lines.push(Line::from(Span::styled(
            format!("query: {}", query),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

/// Plain-text preview of the first rows of a tabular excerpt
pub fn table_preview(data: &[DataRow]) -> Vec<String> {
    let Some(first) = data.first() else {
        return Vec::new();
    };

    let columns: Vec<&String> = first.keys().collect();
    let mut out = vec![columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" | ")];

    for row in data.iter().take(UI_TABLE_PREVIEW_ROWS) {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| match row.get(*c) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(value) => value.to_string(),
                None => String::new(),
            })
            .collect();
        out.push(cells.join(" | "));
    }

    if data.len() > UI_TABLE_PREVIEW_ROWS {
        out.push(format!("... {} more rows", data.len() - UI_TABLE_PREVIEW_ROWS));
    }

    out
}

fn render_examples(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = EXAMPLE_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, question)| {
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::Green)),
                Span::raw(*question),
            ])
        })
        .collect();

    let examples = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Try asking (press the number) "),
    );
    f.render_widget(examples, area);
}

fn render_input(f: &mut Frame, app: &TuiApp, area: Rect) {
    let title = if app.controller.is_loading() {
        " Waiting for answer... "
    } else if app.mode == Mode::Insert {
        " Ask a question (Esc: browse, Enter: send) "
    } else {
        " i: type, j/k: chats, q: quit "
    };

    let style = if app.controller.is_loading() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let input = Paragraph::new(app.controller.input())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);

    if app.mode == Mode::Insert && !app.controller.is_loading() {
        let cursor_x = area.x + 1 + app.controller.input().chars().count() as u16;
        f.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_preview_keeps_column_order() {
        let row: DataRow = serde_json::from_str(
            r#"{"department_name": "IT", "total_price": 10000}"#,
        )
        .unwrap();

        let preview = table_preview(&[row]);
        assert_eq!(preview[0], "department_name | total_price");
        assert_eq!(preview[1], "IT | 10000");
    }

    #[test]
    fn test_table_preview_truncates_long_excerpts() {
        let rows: Vec<DataRow> = (0..15)
            .map(|i| serde_json::from_str(&format!(r#"{{"n": {}}}"#, i)).unwrap())
            .collect();

        let preview = table_preview(&rows);
        // header + preview rows + truncation note
        assert_eq!(preview.len(), 1 + UI_TABLE_PREVIEW_ROWS + 1);
        assert_eq!(preview.last().unwrap(), "... 5 more rows");
    }

    #[test]
    fn test_error_messages_render_in_red() {
        let err = crate::utils::GatewayError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        let message = Message::from_failure(&err);
        let lines = message_lines(&message);
        assert!(lines.len() >= 2);
    }
}
