use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let session = &app.session;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "topic": session.topic(),
                "path": app.deck_path().to_string_lossy(),
                "cards": session.cards(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if !session.has_cards() {
                println!("No flashcards yet. Run `flashdeck generate --topic <TOPIC>` to create some.");
                return Ok(());
            }

            let topic = session.topic().unwrap_or("Untitled deck");
            println!(
                "{} ({} cards)",
                terminal::paint(topic, Color::BOLD, use_color),
                session.total_cards()
            );
            println!();
            println!("{}", terminal::render_cards(session.cards(), use_color));
        }
    }

    Ok(())
}
