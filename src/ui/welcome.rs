//! Welcome screen: name entry, category/difficulty pickers, high score.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(15),
        Constraint::Fill(1),
    ])
    .split(area);

    let name_display = if app.name_input.is_empty() {
        Span::styled("type your name_", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!("{}_", app.name_input),
            Style::default().fg(Color::White).bold(),
        )
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TRIVIA QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("10 Questions · 15 Seconds Each".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(name_display),
        Line::from(""),
        Line::from(vec![
            Span::styled("◂ ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.category_label(), Style::default().fg(Color::Yellow)),
            Span::styled(" ▸", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled("▴ ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.difficulty_label(), Style::default().fg(Color::Magenta)),
            Span::styled(" ▾", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(format!("High Score: {}", app.high_score).fg(Color::Green)),
        Line::from(""),
    ];

    content.push(match &app.error {
        Some(error) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            "ENTER to start",
            Style::default().fg(Color::Green).bold(),
        )),
    });

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(2)),
    );

    frame.render_widget(widget, chunks[1]);
}
