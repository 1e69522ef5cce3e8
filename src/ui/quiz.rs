//! Quiz screen: prompt, shuffled options, countdown, score and progress.
//!
//! Once the question is locked the options are revealed: the correct one
//! turns green and a wrong pick turns red, matching the original game.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Seconds at which the countdown display turns urgent.
const TIMER_WARNING_SECONDS: u64 = 5;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // status line
        Constraint::Length(1), // progress bar
        Constraint::Length(1),
        Constraint::Length(4), // prompt
        Constraint::Fill(1),   // options
        Constraint::Length(1), // controls
    ])
    .margin(2)
    .split(area);

    render_status(frame, chunks[0], app);
    render_progress_bar(frame, chunks[1], app);
    render_prompt(frame, chunks[3], &question.prompt);
    render_options(frame, chunks[4], app);
    render_controls(frame, chunks[5], app.session.is_locked());
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let left = Paragraph::new(Line::from(vec![
        Span::styled(app.session.player_name(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("  ·  score {}", app.session.score()),
            Style::default().fg(Color::Gray),
        ),
    ]));
    frame.render_widget(left, halves[0]);

    let seconds = app.session.seconds_remaining();
    let timer_style = if seconds <= TIMER_WARNING_SECONDS && !app.session.is_locked() {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::Gray)
    };

    let right = Paragraph::new(Line::from(vec![
        Span::styled(format!("⏱ {:2}s", seconds), timer_style),
        Span::styled(
            format!(
                "  ·  {}/{}",
                app.session.current_index() + 1,
                app.session.total_questions()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(right, halves[1]);
}

fn render_progress_bar(frame: &mut Frame, area: Rect, app: &App) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(app.session.progress())
        .label("");
    frame.render_widget(gauge, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &str) {
    let widget = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App) {
    let locked = app.session.is_locked();
    let chosen = app.session.current_choice();
    let mut lines: Vec<Line> = Vec::with_capacity(app.session.options().len() * 2);

    for (index, option) in app.session.options().iter().enumerate() {
        let is_selected = index == app.selected_option;

        let style = if locked {
            if option.is_correct {
                Style::default().fg(Color::Green).bold()
            } else if chosen == Some(index) {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            }
        } else if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };

        let marker = if !locked && is_selected { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, locked: bool) {
    let text = if locked {
        "enter next  ·  esc abandon quiz  ·  q quit"
    } else {
        "j/k choose  ·  enter answer  ·  s skip  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
