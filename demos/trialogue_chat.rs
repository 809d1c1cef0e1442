//! Trialogue Chat Example
//!
//! Runs a three-way conversation between Claude, Gemini and GPT on a topic given on the
//! command line, then prints the transcript as an export document.
//!
//! Run with:
//! ```bash
//! export ANTHROPIC_API_KEY=your_key
//! export GOOGLE_API_KEY=your_key
//! export OPENAI_API_KEY=your_key
//! cargo run --example trialogue_chat -- "The best method for time management"
//! ```
//!
//! Missing keys are fine: that participant answers with a placeholder. Without a topic
//! argument the first suggested topic is used.

use std::error::Error as StdError;
use std::sync::Arc;
use trialogue::config::{Credentials, TrialogueConfig};
use trialogue::event::LoggingEventHandler;
use trialogue::export::{export, suggested_filename};
use trialogue::orchestrator::{RoundOrchestrator, RoundOutcome, RoundReport, Roster};
use trialogue::session::Session;
use trialogue::topics;

fn print_round(report: &RoundReport) {
    println!("\n--- Round {} ---", report.round);
    for turn in &report.turns {
        println!("{} {}: {}", turn.marker(), turn.speaker(), turn.content());
    }
    if let RoundOutcome::Halted { speaker } = &report.outcome {
        println!("\n⛔ {} ran out of quota, the conversation has ended.", speaker);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let topic = match std::env::args().nth(1) {
        Some(topic) => topic,
        None => topics::all_topics()
            .next()
            .unwrap_or("Remote work vs office work")
            .to_string(),
    };

    let credentials = Credentials::from_env();
    let config = TrialogueConfig::default();
    let roster = Roster::from_credentials(&credentials, &config);

    println!("\n{}", "=".repeat(80));
    println!("  💬 {}", topic);
    for (speaker, available) in roster.availability() {
        let status = if available { "connected" } else { "no key, sample replies" };
        println!("  {} {}: {}", speaker.icon(), speaker, status);
    }
    println!("{}", "=".repeat(80));

    let orchestrator =
        RoundOrchestrator::new(roster, config).with_event_handler(Arc::new(LoggingEventHandler));
    let mut session = Session::new(&topic)?;

    let mut report = orchestrator.start(&mut session).await?;
    print_round(&report);
    while report.outcome == RoundOutcome::Completed && orchestrator.can_advance(&session) {
        report = orchestrator.advance(&mut session).await?;
        print_round(&report);
    }
    if session.is_active() {
        let summary = orchestrator.stop(&mut session).await?;
        println!(
            "\nFinished {} rounds with {} messages.",
            summary.rounds, summary.messages
        );
    }

    if let Some(document) = export(&session) {
        println!("\n# {}", suggested_filename(&document.exported_at));
        println!("{}", document.to_json()?);
    }
    Ok(())
}
