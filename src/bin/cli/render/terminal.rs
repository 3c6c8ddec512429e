use flashdeck_lib::flashcards::Flashcard;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color code when color is enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Color for an ease value: red when struggling, green when comfortable
fn ease_color(ease: f64) -> &'static str {
    if ease < 1.8 {
        Color::RED
    } else if ease < 2.5 {
        Color::YELLOW
    } else {
        Color::GREEN
    }
}

/// Render one card as a header line plus wrapped front and back
pub fn render_card(card: &Flashcard, use_color: bool) -> Vec<String> {
    let mut lines = Vec::new();

    let stats = format!("ease {:.2}  reviews {}", card.ease, card.reviews);
    lines.push(format!(
        "{} {}",
        paint(&format!("#{}", card.id), Color::BOLD, use_color),
        paint(&stats, ease_color(card.ease), use_color)
    ));

    for line in wrap_lines(&card.front, "  Q: ", 80) {
        lines.push(line);
    }
    for line in wrap_lines(&card.back, "  A: ", 80) {
        lines.push(paint(&line, Color::DIM, use_color));
    }

    lines
}

/// Render a list of cards separated by blank lines
pub fn render_cards(cards: &[Flashcard], use_color: bool) -> String {
    cards
        .iter()
        .map(|card| render_card(card, use_color).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Word-wrap text; the first line carries `prefix`, the rest are indented to match
fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let indent = " ".repeat(prefix.chars().count());
    let effective_width = max_width.saturating_sub(indent.len()).max(1);

    let mut current_line = String::new();
    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{}{}", prefix, line)
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect()
}
