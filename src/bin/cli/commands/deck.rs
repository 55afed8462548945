//! `certprep deck <topic>`: print a flashcard deck.

use anyhow::{anyhow, Result};
use tokio::runtime::Runtime;

use certprep_lib::models::{DeckContent, ExamType, Topic};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    runtime: &Runtime,
    topic: &str,
    exam: ExamType,
    refresh: bool,
    format: &OutputFormat,
) -> Result<()> {
    let topic: Topic = topic.parse().map_err(|e: String| anyhow!(e))?;

    let generator = app
        .generator
        .clone()
        .ok_or_else(|| anyhow!(app.config_error.clone().unwrap_or_default()))?;

    let deck = runtime.block_on(generator.deck(topic, exam, refresh))?;

    match format {
        OutputFormat::Json => print_json(&deck)?,
        OutputFormat::Plain => print_plain(topic, &deck),
    }

    Ok(())
}

fn print_json(deck: &DeckContent) -> Result<()> {
    let json = match deck {
        DeckContent::Plain(cards) => serde_json::to_string_pretty(cards)?,
        DeckContent::Ekg(cards) => serde_json::to_string_pretty(cards)?,
        DeckContent::BodyPositions(cards) => serde_json::to_string_pretty(cards)?,
    };
    println!("{json}");
    Ok(())
}

fn print_plain(topic: Topic, deck: &DeckContent) {
    println!("{} ({} cards)", topic.label(), deck.len());
    println!();

    match deck {
        DeckContent::Plain(cards) => {
            for card in cards {
                println!("{}", card.term);
                println!("  {}", card.definition);
                if !card.context.is_empty() {
                    println!("  ({})", card.context);
                }
                println!();
            }
        }
        DeckContent::Ekg(cards) => {
            for card in cards {
                println!("{}", card.interpretation);
                println!("  {}", card.explanation);
                println!("  Response: {}", card.response_procedure);
                if card.image.is_some() {
                    println!("  [illustration attached]");
                }
                println!();
            }
        }
        DeckContent::BodyPositions(cards) => {
            for card in cards {
                println!("{}", card.position_name);
                println!("  {}", card.description);
                println!("  Purpose: {}", card.purpose);
                if card.image.is_some() {
                    println!("  [illustration attached]");
                }
                println!();
            }
        }
    }
}
