use anyhow::Result;
use uuid::Uuid;

use studydeck::review::{GradeOutcome, NextCard};

use crate::app::App;
use crate::OutputFormat;

/// CLI-facing grading outcome
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutcomeArg {
    Correct,
    Incorrect,
}

impl From<OutcomeArg> for GradeOutcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Correct => GradeOutcome::Correct,
            OutcomeArg::Incorrect => GradeOutcome::Incorrect,
        }
    }
}

fn print_next(app: &App, next: &NextCard, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(next)?),
        OutputFormat::Plain => match next {
            NextCard::Card { card_id } => {
                let card = app.catalog.get_card(*card_id)?;
                println!("Card {}", card_id);
                println!("  {}", card.front);
            }
            NextCard::Complete => println!("All cards reviewed. Session complete."),
        },
    }
    Ok(())
}

pub fn run_start(
    app: &App,
    cohort_id: Uuid,
    student_id: Uuid,
    format: &OutputFormat,
) -> Result<()> {
    let next = app.reviewer.start_session(cohort_id, student_id)?;
    print_next(app, &next, format)
}

pub fn run_reveal(
    app: &App,
    cohort_id: Uuid,
    student_id: Uuid,
    card_id: Uuid,
    format: &OutputFormat,
) -> Result<()> {
    app.reviewer.reveal_back(cohort_id, student_id, card_id)?;
    let card = app.catalog.get_card(card_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!("Card {}", card_id);
            println!("  {}", card.front);
            println!("  → {}", card.back);
        }
    }
    Ok(())
}

pub fn run_grade(
    app: &App,
    cohort_id: Uuid,
    student_id: Uuid,
    card_id: Uuid,
    outcome: OutcomeArg,
    format: &OutputFormat,
) -> Result<()> {
    let next = app
        .reviewer
        .grade(cohort_id, student_id, card_id, outcome.into())?;
    print_next(app, &next, format)
}

pub fn run_due(
    app: &App,
    cohort_id: Uuid,
    student_id: Uuid,
    format: &OutputFormat,
) -> Result<()> {
    let due = app.reviewer.list_due(cohort_id, student_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&due)?),
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due.");
            }
            for card_id in due {
                println!("{}", card_id);
            }
        }
    }
    Ok(())
}
