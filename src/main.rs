//! Takhrij - terminal front-end
//!
//! Type a topic to search. `:c N` shows commentary for result N, `:g` the
//! glossary, `:r` starts over, `:q` quits.

use anyhow::Result;
use std::sync::Arc;
use takhrij_lib::{
    Glossary, HttpHadithService, ServiceConfig, SessionController, SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("takhrij=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServiceConfig::from_env()?;
    tracing::info!("Using service at {}", config.base_url);
    let service = Arc::new(HttpHadithService::new(config)?);
    let controller = SessionController::new(service);

    println!("Takhrij: enter a keyword or phrase (:g glossary, :c N commentary, :r reset, :q quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            ":q" => break,
            ":g" => print_glossary()?,
            ":r" => {
                controller.reset();
                println!("Session cleared.");
            }
            _ if line.starts_with(":c") => {
                let state = controller.snapshot();
                let record = line[2..]
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| state.records().get(i).cloned());
                match record {
                    Some(record) => match controller.request_commentary(&record).await {
                        Ok(()) => print_commentary(&controller.snapshot()),
                        Err(e) => println!("{}", e),
                    },
                    None => println!("No such result."),
                }
            }
            _ => {
                controller.submit_search(line).await;
                print_results(&controller.snapshot());
            }
        }
    }

    Ok(())
}

fn print_results(state: &SessionState) {
    let Some(response) = state.rendered_response() else {
        return;
    };

    if !state.has_results() {
        if !response.leading_narrative.is_empty() {
            println!("{}", response.leading_narrative);
        }
        return;
    }

    println!("\nResults");
    for (i, record) in response.records.iter().enumerate() {
        println!("\n[{}] {}", i + 1, record.reference);
        if !record.arabic_text.is_empty() {
            println!("{}", record.arabic_text);
        }
        if !record.english_text.is_empty() {
            println!("{}", record.english_text);
        }
        if !record.warning.is_empty() {
            println!("Warning: {}", record.warning);
        }
        if SessionState::can_request_commentary(record) {
            println!("(:c {} for commentary)", i + 1);
        }
    }
}

fn print_commentary(state: &SessionState) {
    if let Some(result) = state.rendered_commentary() {
        println!("\nHadith Commentary\n\n{}", result.export_text());
        println!("\nThis is an AI-generated explanation and may contain errors. Always verify with qualified scholars.");
    }
}

fn print_glossary() -> Result<()> {
    let glossary = Glossary::embedded()?;
    for term in &glossary.terms {
        println!("\n{}", term.term);
        println!("Definition: {}", term.definition);
        println!("Reference: {}", term.reference);
        println!("Example: {}", term.example);
    }
    println!("\nArabic sources:");
    for title in &glossary.further_reading.arabic {
        println!("  - {}", title);
    }
    println!("English sources:");
    for title in &glossary.further_reading.english {
        println!("  - {}", title);
    }
    Ok(())
}
