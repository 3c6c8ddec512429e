use anyhow::{Context, Result};

use flashdeck_lib::flashcards::GenerationIntent;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    topic: Option<&str>,
    count: Option<usize>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let generator = app.generator()?;
    let count = count.unwrap_or_else(|| app.card_count());
    let intent = match topic {
        Some(t) => GenerationIntent::Topic(t.to_string()),
        None => GenerationIntent::More,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let added = runtime
        .block_on(app.session.generate(&generator, intent, count))
        .context("Failed to generate flashcards")?;

    let session = &app.session;
    let new_cards = &session.cards()[session.total_cards() - added..];

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "topic": session.topic(),
                "model": generator.model(),
                "reasoning": session.last_reasoning(),
                "cards": new_cards,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Added {} cards ({} total) with {}",
                terminal::paint(&added.to_string(), Color::BOLD, use_color),
                session.total_cards(),
                generator.model()
            );
            if let Some(reasoning) = session.last_reasoning() {
                println!("{}", terminal::paint(reasoning, Color::GRAY, use_color));
            }
            println!();
            println!("{}", terminal::render_cards(new_cards, use_color));
        }
    }

    Ok(())
}
