use anyhow::Result;
use uuid::Uuid;

use crate::app::App;
use crate::OutputFormat;

pub fn run_create(
    app: &App,
    owner: Uuid,
    name: &str,
    description: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.catalog.create_deck(owner, name.to_string(), description)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => println!("Created deck '{}' ({})", deck.name, deck.id),
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = app.catalog.list_decks()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decks)?),
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks.");
            }
            for deck in decks {
                println!("{}  {} ({} cards)", deck.id, deck.name, deck.card_count);
            }
        }
    }
    Ok(())
}

pub fn run_delete(app: &App, deck_id: Uuid) -> Result<()> {
    app.delete_deck(deck_id)?;
    println!("Deleted deck {}", deck_id);
    Ok(())
}
