//! Quiz authoring and lifecycle commands.

use std::path::Path;

use anyhow::{bail, Result};
use chrono::Utc;
use comfy_table::Table;
use uuid::Uuid;

use quizbuilder_core::model::Quiz;
use quizbuilder_core::parser;
use quizbuilder_store::Store;

use super::{require_session, require_teacher};

pub fn create(store: &Store, file: &Path) -> Result<()> {
    let session = require_teacher(store)?;

    let draft = parser::parse_quiz(file)?;
    let issues = parser::validate(&draft);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  - {issue}");
        }
        bail!("quiz file has {} problem(s)", issues.len());
    }

    let quiz = draft.into_quiz(session.id, Utc::now());
    println!("Created quiz '{}' ({})", quiz.title, quiz.id);
    println!("Publish it with: quizbuilder quiz publish {}", quiz.id);
    store.add_quiz(quiz)?;
    Ok(())
}

pub fn update(store: &Store, id: Uuid, file: &Path) -> Result<()> {
    let session = require_teacher(store)?;

    let Some(existing) = store.find_quiz(id)? else {
        bail!("quiz {id} not found");
    };
    if existing.created_by != session.id {
        bail!("you can only edit your own quizzes");
    }

    let draft = parser::parse_quiz(file)?;
    let issues = parser::validate(&draft);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  - {issue}");
        }
        bail!("quiz file has {} problem(s)", issues.len());
    }

    // Content comes from the file; identity, ownership, and publication
    // state stay as they were.
    let updated = Quiz {
        id: existing.id,
        title: draft.title,
        description: draft.description,
        category: draft.category,
        time_limit: draft.time_limit,
        questions: draft.questions,
        created_by: existing.created_by,
        created_at: existing.created_at,
        is_published: existing.is_published,
    };
    store.update_quiz(&updated)?;
    println!("Updated quiz '{}'", updated.title);
    Ok(())
}

pub fn list(store: &Store) -> Result<()> {
    let session = require_session(store)?;
    let quizzes = store.quizzes()?;

    // Students see the published catalogue; teachers see their own quizzes.
    let visible: Vec<&Quiz> = if session.is_student() {
        quizzes.iter().filter(|quiz| quiz.is_published).collect()
    } else {
        quizzes
            .iter()
            .filter(|quiz| quiz.created_by == session.id)
            .collect()
    };

    if visible.is_empty() {
        println!("No quizzes to show.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Title",
        "Category",
        "Questions",
        "Time limit",
        "Published",
    ]);
    for quiz in visible {
        table.add_row(vec![
            quiz.id.to_string(),
            quiz.title.clone(),
            quiz.category.label().to_string(),
            quiz.questions.len().to_string(),
            if quiz.time_limit > 0 {
                format!("{} min", quiz.time_limit)
            } else {
                "none".to_string()
            },
            if quiz.is_published { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn set_published(store: &Store, id: Uuid, is_published: bool) -> Result<()> {
    let session = require_teacher(store)?;

    let Some(quiz) = store.find_quiz(id)? else {
        bail!("quiz {id} not found");
    };
    if quiz.created_by != session.id {
        bail!("you can only publish your own quizzes");
    }

    store.set_published(id, is_published)?;
    if is_published {
        println!("Published '{}'", quiz.title);
    } else {
        println!("Unpublished '{}'", quiz.title);
    }
    Ok(())
}

pub fn delete(store: &Store, id: Uuid) -> Result<()> {
    let session = require_teacher(store)?;

    let Some(quiz) = store.find_quiz(id)? else {
        bail!("quiz {id} not found");
    };
    if quiz.created_by != session.id {
        bail!("you can only delete your own quizzes");
    }

    store.delete_quiz(id)?;
    println!("Deleted '{}'", quiz.title);
    Ok(())
}
