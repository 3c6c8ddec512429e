use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            "Welcome to AI Flashcards",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Enter a topic to generate your first set of flashcards",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(welcome, rows[1]);

    let input_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Percentage(70),
            Constraint::Percentage(15),
        ])
        .split(rows[2])[1];

    let (text, style) = if state.is_generating() {
        ("Generating...".to_string(), Style::default().fg(Color::DarkGray))
    } else if state.topic_input.is_empty() {
        (
            "e.g., World War II, Python Programming, Biology...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (format!("{}█", state.topic_input), Style::default())
    };
    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Topic "));
    f.render_widget(input, input_area);

    if let Some(error) = state.session.generation_error() {
        let error = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(error, rows[3]);
    }

    let tip = Paragraph::new(
        "Tip: Be specific for better results. 'French Revolution causes' works better than just 'History'",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(tip, rows[4]);
}
