//! Loading screen shown while the question fetch is in flight.

use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;

const SPINNER_FRAMES: [&str; 4] = ["▖", "▘", "▝", "▗"];
const SPINNER_INTERVAL_MS: u128 = 150;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(area);

    let elapsed = app
        .loading_since
        .map(|since| since.elapsed().as_millis())
        .unwrap_or(0);
    let spinner = SPINNER_FRAMES[(elapsed / SPINNER_INTERVAL_MS) as usize % SPINNER_FRAMES.len()];

    let content = vec![
        Line::from(Span::styled(
            format!("{} Fetching questions...", spinner),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("esc to cancel".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
