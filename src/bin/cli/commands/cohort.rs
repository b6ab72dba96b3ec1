use anyhow::Result;
use uuid::Uuid;

use crate::app::App;
use crate::OutputFormat;

pub fn run_create(app: &App, owner: Uuid, name: &str, format: &OutputFormat) -> Result<()> {
    let cohort = app.catalog.create_cohort(owner, name.to_string())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cohort)?),
        OutputFormat::Plain => println!("Created cohort '{}' ({})", cohort.name, cohort.id),
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let cohorts = app.catalog.list_cohorts()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cohorts)?),
        OutputFormat::Plain => {
            if cohorts.is_empty() {
                println!("No cohorts.");
            }
            for cohort in cohorts {
                println!(
                    "{}  {} ({} students, {} cards)",
                    cohort.id,
                    cohort.name,
                    cohort.student_ids.len(),
                    cohort.card_ids.len()
                );
            }
        }
    }
    Ok(())
}

pub fn run_enroll(app: &App, cohort_id: Uuid, student_id: Uuid) -> Result<()> {
    let cohort = app.enroll_student(cohort_id, student_id)?;
    println!(
        "Enrolled student {} into '{}' ({} assigned cards)",
        student_id,
        cohort.name,
        cohort.card_ids.len()
    );
    Ok(())
}

pub fn run_withdraw(app: &App, cohort_id: Uuid, student_id: Uuid) -> Result<()> {
    let cohort = app.withdraw_student(cohort_id, student_id)?;
    println!("Withdrew student {} from '{}'", student_id, cohort.name);
    Ok(())
}

pub fn run_assign(app: &App, cohort_id: Uuid, card_ids: &[Uuid]) -> Result<()> {
    let cohort = app.assign_cards(cohort_id, card_ids)?;
    println!(
        "Assigned {} card(s) to '{}' for {} student(s)",
        card_ids.len(),
        cohort.name,
        cohort.student_ids.len()
    );
    Ok(())
}

pub fn run_remove_cards(app: &App, cohort_id: Uuid, card_ids: &[Uuid]) -> Result<()> {
    let cohort = app.remove_cards(cohort_id, card_ids)?;
    println!("Removed {} card(s) from '{}'", card_ids.len(), cohort.name);
    Ok(())
}

pub fn run_progress(
    app: &App,
    cohort_id: Uuid,
    student_id: Uuid,
    format: &OutputFormat,
) -> Result<()> {
    let progress = app.reviewer.progress(cohort_id, student_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&progress)?),
        OutputFormat::Plain => println!(
            "{} total: {} not started, {} learning, {} reviewed",
            progress.total, progress.not_started, progress.learning, progress.reviewed
        ),
    }
    Ok(())
}
