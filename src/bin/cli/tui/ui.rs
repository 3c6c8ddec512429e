use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app_state::{Screen, TuiState};
use super::{card_widget, status_bar, topic_input};

pub fn draw(f: &mut Frame, state: &TuiState) {
    let size = f.area();

    // Main layout: screen + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    match state.screen() {
        Screen::TopicInput => topic_input::draw(f, outer[0], state),
        Screen::Review => card_widget::draw(f, outer[0], state),
    }
    status_bar::draw(f, outer[1], state);

    if state.show_help {
        draw_help(f, size);
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("Space/Enter  show or hide the answer"),
        Line::from("1 2 3 4      rate: again, hard, good, easy"),
        Line::from("h/l  ←/→     previous / next card"),
        Line::from("r            generate more cards"),
        Line::from("c            clear the deck"),
        Line::from("Esc          cancel generation"),
        Line::from("?            toggle this help"),
        Line::from("q            quit"),
    ];

    let popup = centered_rect(50, lines.len() as u16 + 2, area);
    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys "));
    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}

/// A rect `width` percent wide and `height` rows tall, centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width) / 2),
            Constraint::Percentage(width),
            Constraint::Percentage((100 - width) / 2),
        ])
        .split(vertical[1])[1]
}
