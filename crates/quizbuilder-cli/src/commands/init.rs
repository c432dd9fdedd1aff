//! The `quizbuilder init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("sample-quiz.toml").exists() {
        println!("sample-quiz.toml already exists, skipping.");
    } else {
        std::fs::write("sample-quiz.toml", SAMPLE_QUIZ)?;
        println!("Created sample-quiz.toml");
    }

    println!("\nNext steps:");
    println!("  1. Register a teacher account:");
    println!("       quizbuilder register --name You --email you@example.com --password secret --role teacher");
    println!("  2. Create the sample quiz: quizbuilder quiz create --file sample-quiz.toml");
    println!("  3. Publish it: quizbuilder quiz publish <quiz-id>");
    println!("  4. Register a student account and take it: quizbuilder take <quiz-id>");

    Ok(())
}

const SAMPLE_QUIZ: &str = r#"[quiz]
title = "World Capitals"
description = "A quick geography warm-up"
category = "multiple-choice"
time_limit = 5

[[questions]]
prompt = "What is the capital of France?"
points = 1
options = ["Paris", "London", "Berlin", "Madrid"]
correct_option = 0

[[questions]]
prompt = "What is the capital of Spain?"
points = 1
options = ["Lisbon", "Madrid", "Rome", "Athens"]
correct_option = 1

[[questions]]
prompt = "What is the capital of Germany?"
points = 2
options = ["Vienna", "Zurich", "Berlin", "Hamburg"]
correct_option = 2
"#;
