use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use flashdeck_lib::flashcards::Rating;

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let session = &state.session;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // Header: topic and progress
    let mut header = Vec::new();
    if let Some(topic) = session.topic() {
        header.push(Line::from(Span::styled(
            topic.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    header.push(Line::from(Span::styled(
        format!(
            "{} {} {}",
            if session.can_go_prev() { "◀" } else { " " },
            session.progress_label(),
            if session.can_go_next() { "▶" } else { " " },
        ),
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(Paragraph::new(header).alignment(Alignment::Center), rows[0]);

    let Some(card) = session.current_card() else {
        return;
    };

    let (label, text, border) = if session.is_flipped() {
        ("Answer", card.back.as_str(), Color::Green)
    } else {
        ("Question", card.front.as_str(), Color::Cyan)
    };

    let card_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", label))
        .title_bottom(
            Line::from(format!(" ease {:.2} · reviews {} ", card.ease, card.reviews))
                .right_aligned(),
        );

    // Vertically center the text inside the card
    let inner = card_block.inner(rows[1]);
    f.render_widget(card_block, rows[1]);
    let body = card_body(text);
    let text_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(wrapped_height(&body, inner.width, inner.height)),
            Constraint::Min(0),
        ])
        .split(inner);
    f.render_widget(body, text_rows[1]);

    // Rating buttons once the answer is showing
    let actions = if session.is_flipped() {
        let mut spans = Vec::new();
        for (i, rating) in Rating::ALL.iter().enumerate() {
            let color = match rating {
                Rating::Again => Color::Red,
                Rating::Hard => Color::Yellow,
                Rating::Good => Color::Blue,
                Rating::Easy => Color::Green,
            };
            spans.push(Span::styled(
                format!(" [{}] {} ", i + 1, rating.label()),
                Style::default().fg(color),
            ));
        }
        Line::from(spans)
    } else {
        Line::from(Span::styled(
            "[Space] Show Answer",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    };
    f.render_widget(Paragraph::new(actions).alignment(Alignment::Center), rows[2]);
}

fn card_body(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// Rows the wrapped paragraph needs at `width`, capped at `max_height`
fn wrapped_height(body: &Paragraph, width: u16, max_height: u16) -> u16 {
    let lines = body.line_count(width.max(1));
    u16::try_from(lines).unwrap_or(u16::MAX).min(max_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_height_breaks_on_words() {
        assert_eq!(wrapped_height(&card_body("alpha beta"), 5, 10), 2);
        assert_eq!(wrapped_height(&card_body("alpha beta"), 20, 10), 1);
    }

    #[test]
    fn test_wrapped_height_long_text_is_capped() {
        let text = "word ".repeat(100_000);
        assert_eq!(wrapped_height(&card_body(&text), 10, 12), 12);
    }
}
