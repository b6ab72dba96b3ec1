use anyhow::Result;
use uuid::Uuid;

use crate::app::App;
use crate::OutputFormat;

pub fn run_add(
    app: &App,
    deck_id: Uuid,
    front: String,
    back: String,
    format: &OutputFormat,
) -> Result<()> {
    let card = app.catalog.create_card(deck_id, front, back)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Added card {} to deck {}", card.id, deck_id),
    }
    Ok(())
}

pub fn run_list(app: &App, deck_id: Uuid, format: &OutputFormat) -> Result<()> {
    let cards = app.catalog.list_cards(deck_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards in deck {}.", deck_id);
            }
            for card in cards {
                println!("{}  {}", card.id, card.front);
            }
        }
    }
    Ok(())
}

pub fn run_delete(app: &App, card_id: Uuid) -> Result<()> {
    app.delete_card(card_id)?;
    println!("Deleted card {}", card_id);
    Ok(())
}
