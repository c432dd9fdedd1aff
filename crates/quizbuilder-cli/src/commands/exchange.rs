//! Import and export commands.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use uuid::Uuid;

use quizbuilder_core::exchange::{export_quizzes, import_quizzes};
use quizbuilder_core::model::Quiz;
use quizbuilder_store::Store;

use super::require_session;

pub fn export(store: &Store, output: &Path, ids: Option<String>) -> Result<()> {
    let session = require_session(store)?;

    let quizzes = store.quizzes()?;
    let mine: Vec<&Quiz> = quizzes
        .iter()
        .filter(|quiz| quiz.created_by == session.id)
        .collect();
    if mine.is_empty() {
        bail!("you have no quizzes to export yet");
    }

    let selected: Vec<Uuid> = match ids {
        Some(list) => list
            .split(',')
            .map(|raw| {
                raw.trim()
                    .parse::<Uuid>()
                    .with_context(|| format!("invalid quiz id: {raw}"))
            })
            .collect::<Result<_>>()?,
        None => mine.iter().map(|quiz| quiz.id).collect(),
    };

    // Only the caller's own quizzes leave the store.
    let own_selected: Vec<Uuid> = selected
        .into_iter()
        .filter(|id| mine.iter().any(|quiz| quiz.id == *id))
        .collect();
    if own_selected.is_empty() {
        bail!("none of the selected quizzes belong to you");
    }

    let json = export_quizzes(&quizzes, &own_selected, Utc::now())?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Exported {} quiz(es) to {}",
        own_selected.len(),
        output.display()
    );
    Ok(())
}

pub fn import(store: &Store, input: &Path) -> Result<()> {
    let session = require_session(store)?;

    let payload = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let outcome = import_quizzes(&payload, session.id, Utc::now())?;

    for quiz in &outcome.imported {
        println!("  imported '{}' ({})", quiz.title, quiz.id);
    }
    for failure in &outcome.failures {
        eprintln!("  failed '{}': {}", failure.title, failure.reason);
    }

    if !outcome.imported.is_empty() {
        let mut quizzes = store.quizzes()?;
        quizzes.extend(outcome.imported.iter().cloned());
        store.save_quizzes(&quizzes)?;
    }

    println!(
        "Imported {} quiz(es), {} failure(s). Imports start unpublished.",
        outcome.imported.len(),
        outcome.failures.len()
    );
    Ok(())
}
