//! End-to-end pipeline: author, publish, take, grade, review, notify.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizbuilder(data_dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizbuilder").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

fn register(data_dir: &Path, name: &str, email: &str, role: &str) {
    quizbuilder(data_dir)
        .args(["register", "--name", name, "--email", email])
        .args(["--password", "secret", "--role", role])
        .assert()
        .success();
}

fn login(data_dir: &Path, email: &str) {
    quizbuilder(data_dir)
        .args(["login", "--email", email, "--password", "secret"])
        .assert()
        .success();
}

const CAPITALS_QUIZ: &str = r#"[quiz]
title = "World Capitals"
category = "multiple-choice"

[[questions]]
prompt = "What is the capital of France?"
options = ["Paris", "London", "Berlin", "Madrid"]
correct_option = 0

[[questions]]
prompt = "What is the capital of Spain?"
options = ["Paris", "London", "Berlin", "Madrid"]
correct_option = 3
"#;

fn create_and_publish(data_dir: &Path) -> String {
    let file = data_dir.join("quiz.toml");
    std::fs::write(&file, CAPITALS_QUIZ).unwrap();
    let output = quizbuilder(data_dir)
        .args(["quiz", "create", "--file"])
        .arg(&file)
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find('(').unwrap() + 1;
    let end = stdout.find(')').unwrap();
    let quiz_id = stdout[start..end].to_string();

    quizbuilder(data_dir)
        .args(["quiz", "publish", &quiz_id])
        .assert()
        .success();
    quiz_id
}

/// Attempt id of the single stored result, read straight from the store
/// file.
fn stored_attempt_id(data_dir: &Path) -> String {
    let raw = std::fs::read_to_string(data_dir.join("quizResults.json")).unwrap();
    let results: serde_json::Value = serde_json::from_str(&raw).unwrap();
    results[0]["id"].as_str().unwrap().to_string()
}

#[test]
fn answers_file_attempt_is_graded_and_reviewable() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();

    register(data, "Ada", "ada@example.com", "teacher");
    let quiz_id = create_and_publish(data);

    register(data, "Sam", "sam@example.com", "student");
    let answers = data.join("answers.json");
    // First question right, second wrong.
    std::fs::write(&answers, r#"{"0": "0", "1": "1"}"#).unwrap();

    quizbuilder(data)
        .args(["take", &quiz_id, "--answers"])
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 5/10"));

    quizbuilder(data)
        .args(["results", &quiz_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("World Capitals: 5/10 (50%)"));

    // The teacher reviews the attempt question by question.
    let attempt_id = stored_attempt_id(data);
    login(data, "ada@example.com");
    quizbuilder(data)
        .args(["review", &attempt_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("taken by Sam"))
        .stdout(predicate::str::contains("Correct"))
        .stdout(predicate::str::contains("Incorrect"))
        .stdout(predicate::str::contains("Madrid"));
}

#[test]
fn interactive_attempt_reads_answers_from_stdin() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();

    register(data, "Ada", "ada@example.com", "teacher");
    let quiz_id = create_and_publish(data);

    register(data, "Sam", "sam@example.com", "student");
    quizbuilder(data)
        .args(["take", &quiz_id])
        .write_stdin("0\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("What is the capital of France?"))
        .stdout(predicate::str::contains("Score: 10/10"));
}

#[test]
fn unpublished_quiz_is_not_takeable_by_students() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();

    register(data, "Ada", "ada@example.com", "teacher");
    let file = data.join("quiz.toml");
    std::fs::write(&file, CAPITALS_QUIZ).unwrap();
    let output = quizbuilder(data)
        .args(["quiz", "create", "--file"])
        .arg(&file)
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find('(').unwrap() + 1;
    let end = stdout.find(')').unwrap();
    let quiz_id = stdout[start..end].to_string();

    register(data, "Sam", "sam@example.com", "student");
    quizbuilder(data)
        .args(["take", &quiz_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available for students"));
}

#[test]
fn dashboard_and_notifications_reflect_the_attempt() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();

    register(data, "Ada", "ada@example.com", "teacher");
    let quiz_id = create_and_publish(data);

    register(data, "Sam", "sam@example.com", "student");
    let answers = data.join("answers.json");
    std::fs::write(&answers, r#"{"0": "0", "1": "3"}"#).unwrap();
    quizbuilder(data)
        .args(["take", &quiz_id, "--answers"])
        .arg(&answers)
        .assert()
        .success();

    login(data, "ada@example.com");

    quizbuilder(data)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 quizzes, 1 students, 1 completed attempts"))
        .stdout(predicate::str::contains("World Capitals"))
        .stdout(predicate::str::contains("Sam"));

    quizbuilder(data)
        .args(["notifications", "--mark-viewed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sam"))
        .stdout(predicate::str::contains("10/10"))
        .stdout(predicate::str::contains("Marked 1 notification(s) as viewed"));

    // Marked viewed, so a second look is quiet.
    quizbuilder(data)
        .arg("notifications")
        .assert()
        .success()
        .stdout(predicate::str::contains("No new quiz attempts."));
}
