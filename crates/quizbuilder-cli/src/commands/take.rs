//! The `quizbuilder take` command.
//!
//! Answers come either from a JSON file (non-interactive) or from an
//! interactive prompt loop. A quiz with a time limit sets a hard deadline:
//! remaining time is shown at each prompt and expiry submits whatever has
//! been collected so far, so auto- and manual submission are mutually
//! exclusive.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::Instant;
use uuid::Uuid;

use quizbuilder_core::model::{AnswerMap, AnswerValue, QuestionKind, Quiz};
use quizbuilder_core::scoring::build_result;
use quizbuilder_core::traits::submit_best_effort;
use quizbuilder_store::Store;
use quizbuilder_sync::HttpResultSubmitter;

use super::require_session;

pub async fn execute(
    store: &Store,
    api_url: &str,
    quiz_id: Uuid,
    answers_file: Option<&Path>,
) -> Result<()> {
    let session = require_session(store)?;

    let Some(quiz) = store.find_quiz(quiz_id)? else {
        bail!("quiz {quiz_id} not found");
    };
    if session.is_student() && !quiz.is_published {
        bail!("this quiz is not available for students");
    }
    if session.is_teacher() && quiz.created_by != session.id && !quiz.is_published {
        bail!("you do not have access to this quiz");
    }

    let answers = match answers_file {
        Some(path) => read_answers_file(path)?,
        None => collect_answers(&quiz).await?,
    };

    let result = build_result(&quiz, session.id, answers, Utc::now());
    store.append_result(&result)?;

    let submitter = HttpResultSubmitter::new(api_url);
    if !submit_best_effort(&submitter, &session, &result).await {
        println!("Collector unavailable; the result was saved locally.");
    }

    println!(
        "Score: {}/10 ({:.2}/{} raw points)",
        result.score, result.total_score, result.total_points
    );
    println!("View details with: quizbuilder results {quiz_id}");
    Ok(())
}

fn read_answers_file(path: &Path) -> Result<AnswerMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers file: {}", path.display()))
}

async fn collect_answers(quiz: &Quiz) -> Result<AnswerMap> {
    let mut answers = AnswerMap::new();
    let deadline = (quiz.time_limit > 0)
        .then(|| Instant::now() + Duration::from_secs(u64::from(quiz.time_limit) * 60));

    println!("{}", quiz.title);
    if !quiz.description.is_empty() {
        println!("{}", quiz.description);
    }
    if quiz.time_limit > 0 {
        println!(
            "Time limit: {} minute(s). The quiz auto-submits when time runs out.",
            quiz.time_limit
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for (index, question) in quiz.questions.iter().enumerate() {
        if let Some(deadline) = deadline {
            let left = deadline.saturating_duration_since(Instant::now());
            let secs = left.as_secs();
            println!("\nTime left: {}:{:02}", secs / 60, secs % 60);
        } else {
            println!();
        }
        println!(
            "Question {} of {}: {}",
            index + 1,
            quiz.questions.len(),
            question.prompt
        );

        match &question.kind {
            QuestionKind::MultipleChoice { options, .. } => {
                for (i, option) in options.iter().enumerate() {
                    println!("  [{i}] {option}");
                }
                let Some(line) = prompt_line(&mut lines, deadline, "Answer (option number): ").await?
                else {
                    break;
                };
                answers.insert(index, AnswerValue::Text(line));
            }
            QuestionKind::TrueFalse { .. } => {
                let Some(line) = prompt_line(&mut lines, deadline, "Answer (true/false): ").await?
                else {
                    break;
                };
                answers.insert(index, AnswerValue::Text(line));
            }
            QuestionKind::ShortAnswer { .. } => {
                let Some(line) = prompt_line(&mut lines, deadline, "Answer: ").await? else {
                    break;
                };
                answers.insert(index, AnswerValue::Text(line));
            }
            QuestionKind::Matching { matching_pairs } => {
                println!("Options:");
                for (i, pair) in matching_pairs.iter().enumerate() {
                    println!("  [{i}] {}", pair.right);
                }
                let mut chosen: BTreeMap<String, String> = BTreeMap::new();
                let mut expired = false;
                for (left_index, pair) in matching_pairs.iter().enumerate() {
                    let prompt = format!("{} matches (option number or blank): ", pair.left);
                    match prompt_line(&mut lines, deadline, &prompt).await? {
                        Some(line) => {
                            // A right-hand option belongs to one left item;
                            // re-assigning it clears the earlier row.
                            if !line.is_empty() {
                                for value in chosen.values_mut() {
                                    if *value == line {
                                        value.clear();
                                    }
                                }
                            }
                            chosen.insert(left_index.to_string(), line);
                        }
                        None => {
                            expired = true;
                            break;
                        }
                    }
                }
                answers.insert(index, AnswerValue::Matches(chosen));
                if expired {
                    break;
                }
            }
        }
    }

    if let Some(deadline) = deadline {
        if Instant::now() >= deadline {
            println!("\nTime is up, submitting what you have.");
        }
    }
    Ok(answers)
}

/// Read one trimmed line, or `None` once the deadline has passed.
async fn prompt_line(
    lines: &mut Lines<BufReader<Stdin>>,
    deadline: Option<Instant>,
    prompt: &str,
) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let line = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, lines.next_line()).await {
            Ok(read) => read?,
            Err(_) => return Ok(None),
        },
        None => lines.next_line().await?,
    };
    // EOF reads as an empty answer so piped input works.
    Ok(Some(line.unwrap_or_default().trim().to_string()))
}
