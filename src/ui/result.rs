//! Result screen: achievement badge, greeting, score partition.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = &app.summary else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(17),
        Constraint::Fill(1),
    ])
    .split(area);

    let score_color = grade_color(summary.percentage);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            summary.achievement.icon,
            Style::default().bold(),
        )),
        Line::from(Span::styled(
            summary.achievement.title,
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            summary.greeting.clone(),
            Style::default().fg(if summary.is_new_record {
                Color::Yellow
            } else {
                Color::Gray
            }),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                summary.score, summary.total, summary.percentage
            ),
            Style::default().fg(score_color).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("✓ {} correct", summary.correct_count),
                Style::default().fg(Color::Green),
            ),
            Span::raw("   "),
            Span::styled(
                format!("✗ {} incorrect", summary.incorrect_count),
                Style::default().fg(Color::Red),
            ),
            Span::raw("   "),
            Span::styled(
                format!("⊘ {} skipped", summary.skipped_count),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(""),
        Line::from(format!("High Score: {}", app.high_score).fg(Color::Green)),
        Line::from(""),
        Line::from(""),
        Line::from("r play again  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}

fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        80..=100 => Color::Green,
        60..=79 => Color::Cyan,
        40..=59 => Color::Yellow,
        _ => Color::Red,
    }
}
