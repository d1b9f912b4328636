//! Interactive prompts for values missing from the command line.

use crate::cli::OutputKind;
use dialoguer::{Input, Select};

/// Ask for the research topic.
pub fn ask_topic() -> dialoguer::Result<String> {
    Input::new()
        .with_prompt("What would you like to research?")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Topic must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
}

/// Ask for a positive number with a default.
pub fn ask_number(prompt: &str, default: usize) -> dialoguer::Result<usize> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .validate_with(|value: &usize| {
            if *value == 0 {
                Err("Must be at least 1")
            } else {
                Ok(())
            }
        })
        .interact_text()
}

pub fn ask_output_kind() -> dialoguer::Result<OutputKind> {
    let selection = Select::new()
        .with_prompt("Generate a report or a specific answer?")
        .items(&["Report", "Answer"])
        .default(0)
        .interact()?;

    Ok(if selection == 1 {
        OutputKind::Answer
    } else {
        OutputKind::Report
    })
}

/// Ask each clarifying question in turn and collect the answers.
pub fn ask_answers(questions: &[String]) -> dialoguer::Result<Vec<String>> {
    questions
        .iter()
        .map(|question| {
            Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()
        })
        .collect()
}
