use anyhow::{bail, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, confirmed: bool, format: &OutputFormat) -> Result<()> {
    if !confirmed {
        bail!(
            "Refusing to delete {} cards without --yes",
            app.session.total_cards()
        );
    }

    let removed = app.session.total_cards();
    app.session.clear();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "removed": removed }));
        }
        OutputFormat::Plain => {
            println!("Removed {} cards.", removed);
        }
    }

    Ok(())
}
