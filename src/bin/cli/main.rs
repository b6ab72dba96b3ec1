mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "studydeck-cli", about = "Cohort flashcard review CLI", version)]
struct Cli {
    /// Data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Deck management
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Card management
    #[command(subcommand)]
    Card(CardCommand),

    /// Cohort membership and card assignment
    #[command(subcommand)]
    Cohort(CohortCommand),

    /// Drive a review session
    #[command(subcommand)]
    Review(ReviewCommand),
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create a new deck
    Create {
        /// Owning instructor id
        #[arg(long)]
        owner: Uuid,
        /// Deck name
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },

    /// List all decks
    List,

    /// Delete a deck and all its cards
    Delete {
        deck_id: Uuid,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to a deck
    Add {
        deck_id: Uuid,
        /// Question side
        front: String,
        /// Answer side
        back: String,
    },

    /// List cards in a deck
    List {
        deck_id: Uuid,
    },

    /// Delete a card
    Delete {
        card_id: Uuid,
    },
}

#[derive(Subcommand)]
enum CohortCommand {
    /// Create a new cohort
    Create {
        /// Owning instructor id
        #[arg(long)]
        owner: Uuid,
        /// Cohort name
        name: String,
    },

    /// List all cohorts
    List,

    /// Enroll a student (back-fills records for assigned cards)
    Enroll {
        cohort_id: Uuid,
        student_id: Uuid,
    },

    /// Withdraw a student and drop their records
    Withdraw {
        cohort_id: Uuid,
        student_id: Uuid,
    },

    /// Assign cards to the cohort, fanning out review records
    Assign {
        cohort_id: Uuid,
        /// Card ids to assign
        #[arg(required = true)]
        card_ids: Vec<Uuid>,
    },

    /// Remove cards from the cohort, cascading into records
    RemoveCards {
        cohort_id: Uuid,
        /// Card ids to remove
        #[arg(required = true)]
        card_ids: Vec<Uuid>,
    },

    /// Show a student's progress in the cohort
    Progress {
        cohort_id: Uuid,
        student_id: Uuid,
    },
}

#[derive(Subcommand)]
enum ReviewCommand {
    /// Start a session: promote assigned cards and draw the first one
    Start {
        cohort_id: Uuid,
        student_id: Uuid,
    },

    /// Reveal the back of the current card
    Reveal {
        cohort_id: Uuid,
        student_id: Uuid,
        card_id: Uuid,
    },

    /// Grade the current card and draw the next
    Grade {
        cohort_id: Uuid,
        student_id: Uuid,
        card_id: Uuid,
        /// Grading outcome
        #[arg(value_enum)]
        outcome: commands::review::OutcomeArg,
    },

    /// List cards still due in the active pass
    Due {
        cohort_id: Uuid,
        student_id: Uuid,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Deck(cmd) => match cmd {
            DeckCommand::Create { owner, name, description } => {
                commands::deck::run_create(&app, owner, &name, description, &cli.format)?;
            }
            DeckCommand::List => {
                commands::deck::run_list(&app, &cli.format)?;
            }
            DeckCommand::Delete { deck_id } => {
                commands::deck::run_delete(&app, deck_id)?;
            }
        },
        Command::Card(cmd) => match cmd {
            CardCommand::Add { deck_id, front, back } => {
                commands::card::run_add(&app, deck_id, front, back, &cli.format)?;
            }
            CardCommand::List { deck_id } => {
                commands::card::run_list(&app, deck_id, &cli.format)?;
            }
            CardCommand::Delete { card_id } => {
                commands::card::run_delete(&app, card_id)?;
            }
        },
        Command::Cohort(cmd) => match cmd {
            CohortCommand::Create { owner, name } => {
                commands::cohort::run_create(&app, owner, &name, &cli.format)?;
            }
            CohortCommand::List => {
                commands::cohort::run_list(&app, &cli.format)?;
            }
            CohortCommand::Enroll { cohort_id, student_id } => {
                commands::cohort::run_enroll(&app, cohort_id, student_id)?;
            }
            CohortCommand::Withdraw { cohort_id, student_id } => {
                commands::cohort::run_withdraw(&app, cohort_id, student_id)?;
            }
            CohortCommand::Assign { cohort_id, card_ids } => {
                commands::cohort::run_assign(&app, cohort_id, &card_ids)?;
            }
            CohortCommand::RemoveCards { cohort_id, card_ids } => {
                commands::cohort::run_remove_cards(&app, cohort_id, &card_ids)?;
            }
            CohortCommand::Progress { cohort_id, student_id } => {
                commands::cohort::run_progress(&app, cohort_id, student_id, &cli.format)?;
            }
        },
        Command::Review(cmd) => match cmd {
            ReviewCommand::Start { cohort_id, student_id } => {
                commands::review::run_start(&app, cohort_id, student_id, &cli.format)?;
            }
            ReviewCommand::Reveal { cohort_id, student_id, card_id } => {
                commands::review::run_reveal(&app, cohort_id, student_id, card_id, &cli.format)?;
            }
            ReviewCommand::Grade { cohort_id, student_id, card_id, outcome } => {
                commands::review::run_grade(
                    &app,
                    cohort_id,
                    student_id,
                    card_id,
                    outcome,
                    &cli.format,
                )?;
            }
            ReviewCommand::Due { cohort_id, student_id } => {
                commands::review::run_due(&app, cohort_id, student_id, &cli.format)?;
            }
        },
    }

    Ok(())
}
