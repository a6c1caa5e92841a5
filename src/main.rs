//! `decision-helper` command-line front end.
//!
//! Each invocation restores the saved session, performs one wizard action and
//! prints the result. Option and question numbers are 1-based.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use decision_helper::adapters::{
    load_image, FileKeyValueStore, HttpDecisionService, HttpServiceConfig,
};
use decision_helper::application::{DecisionStateManager, RequestOutcome};
use decision_helper::config::AppConfig;
use decision_helper::domain::decision::{DecisionOption, DecisionSession, WizardStep};
use decision_helper::telemetry;

#[derive(Debug, Parser)]
#[command(name = "decision-helper", version, about = "Guided decision wizard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the current session
    Show,
    /// Set the decision context
    Context { text: String },
    /// Add an empty option
    AddOption,
    /// Remove option N
    RemoveOption { number: usize },
    /// Set the text of option N
    SetOption { number: usize, text: String },
    /// Use an image file as option N (switches to image mode)
    SetImage { number: usize, path: PathBuf },
    /// Clear the image of option N
    ClearImage { number: usize },
    /// Go back to two empty text options
    TextMode,
    /// Ask the service for clarifying questions
    Questions,
    /// Answer question Q with a choice (by text or 1-based number)
    Answer { question: usize, choice: String },
    /// Remove the answer to question Q
    Undo { question: usize },
    /// Remove all answers
    ClearAnswers,
    /// Ask the service for a recommendation
    Decide,
    /// Clear the session and its saved copy
    Reset,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    if let Err(e) = telemetry::init_tracing(&config.logging) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let service = HttpDecisionService::new(HttpServiceConfig::from(&config.service))?;
    let store = FileKeyValueStore::new(&config.storage.dir);
    let mut manager =
        DecisionStateManager::new(Arc::new(service), Arc::new(store), &config.storage.key);

    let changed = match cli.command {
        Command::Show => true,
        Command::Context { text } => manager.set_context(text),
        Command::AddOption => manager.add_option(),
        Command::RemoveOption { number } => manager.remove_option(to_index(number)?),
        Command::SetOption { number, text } => manager.update_option(to_index(number)?, text),
        Command::SetImage { number, path } => {
            let index = to_index(number)?;
            let image = load_image(&path).await?;
            manager.update_image_option(index, image).await
        }
        Command::ClearImage { number } => manager.clear_image_option(to_index(number)?),
        Command::TextMode => manager.switch_to_text_mode(),
        Command::Questions => {
            if !manager.can_generate_questions() {
                bail!("enter a context and at least two options first");
            }
            println!("Analyzing your context and options...");
            let outcome = manager.generate_questions().await;
            return finish_request(&manager, outcome);
        }
        Command::Answer { question, choice } => {
            let index = to_index(question)?;
            let choice = resolve_choice(manager.session(), index, &choice)?;
            manager.set_answer(index, choice)
        }
        Command::Undo { question } => manager.undo_answer(to_index(question)?),
        Command::ClearAnswers => manager.clear_all_answers(),
        Command::Decide => {
            if !manager.can_generate_decision() {
                bail!("answer every question first");
            }
            let outcome = manager.generate_decision().await;
            return finish_request(&manager, outcome);
        }
        Command::Reset => {
            manager.reset();
            true
        }
    };

    if !changed {
        eprintln!("nothing changed");
    }
    print_session(manager.session());
    Ok(ExitCode::SUCCESS)
}

fn finish_request(manager: &DecisionStateManager, outcome: RequestOutcome) -> Result<ExitCode> {
    match outcome {
        RequestOutcome::Completed => {
            print_session(manager.session());
            Ok(ExitCode::SUCCESS)
        }
        RequestOutcome::Failed => {
            eprintln!("{}", manager.error().unwrap_or("request failed"));
            Ok(ExitCode::FAILURE)
        }
        RequestOutcome::NotReady => bail!("request could not be started"),
    }
}

fn to_index(number: usize) -> Result<usize> {
    if number == 0 {
        bail!("numbers start at 1");
    }
    Ok(number - 1)
}

/// Accepts a choice by exact text or by its 1-based position.
fn resolve_choice(session: &DecisionSession, question: usize, choice: &str) -> Result<String> {
    let Some(q) = session.questions().get(question) else {
        bail!("there is no question {}", question + 1);
    };
    if q.has_choice(choice) {
        return Ok(choice.to_string());
    }
    if let Ok(number) = choice.parse::<usize>() {
        if let Some(text) = number.checked_sub(1).and_then(|i| q.choices().get(i)) {
            return Ok(text.clone());
        }
    }
    bail!("'{}' is not a choice for question {}", choice, question + 1)
}

fn print_session(session: &DecisionSession) {
    println!("Context: {}", display_or_dash(session.context()));

    let mode = if session.is_image_mode() { "images" } else { "text" };
    println!("Options ({}):", mode);
    for (i, option) in session.options().iter().enumerate() {
        println!("  {}. {}", i + 1, describe_option(option));
    }

    if !session.questions().is_empty() {
        println!("Questions:");
        for (i, question) in session.questions().iter().enumerate() {
            let answer = session.answers().get(i).unwrap_or("-");
            println!("  {}. {} [{}]", i + 1, question.prompt(), answer);
            for (c, choice) in question.choices().iter().enumerate() {
                println!("       {}) {}", c + 1, choice);
            }
        }
    }

    if let Some(decision) = session.decision() {
        println!("Recommendation: {}", decision.chosen_option);
        println!("Why: {}", decision.reason);
    }

    match session.current_step() {
        WizardStep::Context if session.can_generate_questions() => {
            println!("Next: run `decision-helper questions`")
        }
        WizardStep::Context => println!("Next: enter a context and at least two options"),
        WizardStep::Questions => match session.first_unanswered() {
            Some(q) => println!("Next: answer question {}", q + 1),
            None => println!("Next: run `decision-helper decide`"),
        },
        WizardStep::Result => {}
    }
}

fn describe_option(option: &DecisionOption) -> String {
    if !option.has_content() {
        return "-".to_string();
    }
    if option.is_image() {
        format!("[image, {} bytes encoded]", option.service_payload().len())
    } else {
        option.content().to_string()
    }
}

fn display_or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}
