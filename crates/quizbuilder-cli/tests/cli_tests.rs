//! CLI integration tests using assert_cmd.

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

const SAMPLE_QUIZ: &str = r#"[quiz]
title = "World Capitals"
description = "Basic geography"
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

fn create_quiz(data_dir: &Path, toml: &str) -> String {
    let file = data_dir.join("quiz.toml");
    std::fs::write(&file, toml).unwrap();
    let output = quizbuilder(data_dir)
        .args(["quiz", "create", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quiz"))
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find('(').unwrap() + 1;
    let end = stdout.find(')').unwrap();
    stdout[start..end].to_string()
}

#[test]
fn help_lists_subcommands() {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizbuilder").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("take"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("notifications"));
}

#[test]
fn register_login_logout_flow() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();

    register(data, "Ada", "ada@example.com", "teacher");

    quizbuilder(data)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"))
        .stdout(predicate::str::contains("teacher"));

    quizbuilder(data)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    quizbuilder(data)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));

    quizbuilder(data)
        .args(["login", "--email", "ada@example.com", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid email or password"));

    quizbuilder(data)
        .args(["login", "--email", "ada@example.com", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ada"));
}

#[test]
fn duplicate_email_is_rejected() {
    let dir = TempDir::new().unwrap();
    register(dir.path(), "Ada", "ada@example.com", "teacher");

    quizbuilder(dir.path())
        .args(["register", "--name", "Imposter", "--email", "ada@example.com"])
        .args(["--password", "other", "--role", "student"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn create_publish_and_student_visibility() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();

    register(data, "Ada", "ada@example.com", "teacher");
    let quiz_id = create_quiz(data, SAMPLE_QUIZ);

    quizbuilder(data)
        .args(["quiz", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("World Capitals"))
        .stdout(predicate::str::contains("no"));

    quizbuilder(data)
        .args(["quiz", "publish", &quiz_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Published 'World Capitals'"));

    // Registering signs the new student in.
    register(data, "Sam", "sam@example.com", "student");
    quizbuilder(data)
        .args(["quiz", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("World Capitals"));

    // Students cannot author quizzes.
    let file = data.join("quiz.toml");
    quizbuilder(data)
        .args(["quiz", "create", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("only available to teachers"));
}

#[test]
fn invalid_quiz_file_is_rejected_with_issues() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();
    register(data, "Ada", "ada@example.com", "teacher");

    let file = data.join("broken.toml");
    std::fs::write(
        &file,
        r#"[quiz]
title = "Broken"
category = "multiple-choice"

[[questions]]
prompt = "No key"
options = ["a", "b"]
correct_option = 9
"#,
    )
    .unwrap();

    quizbuilder(data)
        .args(["quiz", "create", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn update_replaces_content_and_keeps_publication() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();
    register(data, "Ada", "ada@example.com", "teacher");
    let quiz_id = create_quiz(data, SAMPLE_QUIZ);

    quizbuilder(data)
        .args(["quiz", "publish", &quiz_id])
        .assert()
        .success();

    let file = data.join("updated.toml");
    std::fs::write(
        &file,
        r#"[quiz]
title = "European Capitals"
category = "multiple-choice"

[[questions]]
prompt = "What is the capital of Italy?"
options = ["Rome", "Milan", "Naples", "Turin"]
correct_option = 0
"#,
    )
    .unwrap();

    quizbuilder(data)
        .args(["quiz", "update", &quiz_id, "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated quiz 'European Capitals'"));

    // Still published after the edit.
    quizbuilder(data)
        .args(["quiz", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("European Capitals"))
        .stdout(predicate::str::contains("yes"));
}

#[test]
fn delete_requires_ownership() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();
    register(data, "Ada", "ada@example.com", "teacher");
    let quiz_id = create_quiz(data, SAMPLE_QUIZ);

    register(data, "Eve", "eve@example.com", "teacher");
    quizbuilder(data)
        .args(["quiz", "delete", &quiz_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("your own quizzes"));

    quizbuilder(data)
        .args(["login", "--email", "ada@example.com", "--password", "secret"])
        .assert()
        .success();
    quizbuilder(data)
        .args(["quiz", "delete", &quiz_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 'World Capitals'"));
}

#[test]
fn export_import_round_trip() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();

    register(data, "Ada", "ada@example.com", "teacher");
    create_quiz(data, SAMPLE_QUIZ);

    let bundle = data.join("bundle.json");
    quizbuilder(data)
        .args(["export", "--output"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 quiz(es)"));
    assert!(bundle.exists());

    register(data, "Ben", "ben@example.com", "teacher");
    quizbuilder(data)
        .args(["import", "--input"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 quiz(es), 0 failure(s)"));

    // The import belongs to Ben and starts unpublished.
    quizbuilder(data)
        .args(["quiz", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("World Capitals"))
        .stdout(predicate::str::contains("no"));
}

#[test]
fn export_with_nothing_to_share_fails() {
    let dir = TempDir::new().unwrap();
    let data = dir.path();
    register(data, "Sam", "sam@example.com", "student");

    quizbuilder(data)
        .args(["export", "--output"])
        .arg(data.join("bundle.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quizzes to export"));
}

#[test]
fn init_creates_sample_quiz_and_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizbuilder(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sample-quiz.toml"));
    assert!(dir.path().join("sample-quiz.toml").exists());

    quizbuilder(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn commands_require_a_session() {
    let dir = TempDir::new().unwrap();

    quizbuilder(dir.path())
        .args(["quiz", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));

    quizbuilder(dir.path())
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));
}
