use anyhow::Result;

use flashdeck_lib::flashcards::algorithm::weak_cards;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, count: usize, format: &OutputFormat, use_color: bool) -> Result<()> {
    let weak = weak_cards(app.session.cards(), count);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&weak)?);
        }
        OutputFormat::Plain => {
            if weak.is_empty() {
                println!("No reviewed cards yet. Rate some cards to find weak spots.");
                return Ok(());
            }
            println!("{}", terminal::render_cards(&weak, use_color));
        }
    }

    Ok(())
}
