use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use flashdeck_lib::flashcards::Rating;

use super::app_state::{Screen, TuiState};

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.quit = true;
        return;
    }

    if state.confirm_clear {
        state.confirm_clear(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')));
        return;
    }

    if key.code == KeyCode::Esc && state.is_generating() {
        state.cancel_generation();
        return;
    }

    match state.screen() {
        Screen::TopicInput => handle_topic_key(state, key),
        Screen::Review => handle_review_key(state, key),
    }
}

fn handle_topic_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.quit = true,
        // Input is locked while a deck is being generated
        _ if state.is_generating() => {}
        KeyCode::Enter => state.submit_topic(),
        KeyCode::Backspace => {
            state.topic_input.pop();
        }
        KeyCode::Char(c) => {
            state.topic_input.push(c);
        }
        _ => {}
    }
}

fn handle_review_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => state.flip(),
        KeyCode::Char('l') | KeyCode::Right => state.next_card(),
        KeyCode::Char('h') | KeyCode::Left => state.prev_card(),
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(rating) = Rating::from_key(c) {
                state.rate(rating);
            }
        }
        KeyCode::Char('r') => {
            if !state.is_generating() {
                state.generate_more();
            }
        }
        KeyCode::Char('c') => state.request_clear(),
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}
