//! The `quizbuilder notifications` command.
//!
//! One-shot by default; `--watch` polls once per minute until ctrl-c.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use comfy_table::Table;

use quizbuilder_core::model::Session;
use quizbuilder_core::notify::{mark_viewed, unseen_attempts};
use quizbuilder_store::Store;

use super::require_teacher;

const POLL_INTERVAL: Duration = Duration::from_secs(60);

pub async fn execute(store: &Store, watch: bool, mark: bool) -> Result<()> {
    let session = require_teacher(store)?;

    show(store, &session, mark)?;
    if !watch {
        return Ok(());
    }

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    interval.tick().await; // the first tick fires immediately
    loop {
        tokio::select! {
            _ = interval.tick() => show(store, &session, mark)?,
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopped watching.");
                return Ok(());
            }
        }
    }
}

fn show(store: &Store, session: &Session, mark: bool) -> Result<()> {
    let quizzes = store.quizzes()?;
    let results = store.results()?;
    let users = store.users()?;
    let mut viewed = store.viewed_notifications(session.id)?;

    let notifications = unseen_attempts(
        session.id,
        &quizzes,
        &results,
        &users,
        &viewed,
        Utc::now(),
    );

    if notifications.is_empty() {
        println!("No new quiz attempts.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Student", "Quiz", "Score", "Completed", "Attempt"]);
    for notification in &notifications {
        table.add_row(vec![
            notification.student_name.clone(),
            notification.quiz_title.clone(),
            format!("{}/10", notification.score),
            notification.completed_at.to_string(),
            notification.result_id.to_string(),
        ]);
    }
    println!("{table}");
    println!("Review an attempt with: quizbuilder review <attempt-id>");

    if mark {
        mark_viewed(&mut viewed, &notifications);
        store.save_viewed_notifications(session.id, &viewed)?;
        println!("Marked {} notification(s) as viewed.", notifications.len());
    }
    Ok(())
}
