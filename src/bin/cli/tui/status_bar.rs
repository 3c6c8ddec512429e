use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::{Screen, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    if state.confirm_clear {
        let prompt = Paragraph::new(format!(
            " Delete all {} cards? (y/N)",
            state.session.total_cards()
        ))
        .style(Style::default().bg(Color::Red).fg(Color::White));
        f.render_widget(prompt, area);
        return;
    }

    // Show flash message if present
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    if let Some(error) = state.session.generation_error() {
        let error = Paragraph::new(format!(" {}", error))
            .style(Style::default().bg(Color::Red).fg(Color::White));
        f.render_widget(error, area);
        return;
    }

    if state.is_generating() {
        let busy = Paragraph::new(" Generating cards...  Esc: cancel ")
            .style(Style::default().bg(Color::Blue).fg(Color::White));
        f.render_widget(busy, area);
        return;
    }

    let hints = match state.screen() {
        Screen::TopicInput => " Type a topic  Enter: generate  Esc: quit ",
        Screen::Review if state.session.is_flipped() => {
            " 1: again  2: hard  3: good  4: easy  Space: question  h/l: navigate  ?: help "
        }
        Screen::Review => " Space: show answer  h/l: navigate  r: more cards  c: clear  q: quit ",
    };

    let status = Paragraph::new(hints).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}
