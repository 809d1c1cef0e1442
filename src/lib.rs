//! # Trialogue
//!
//! Trialogue runs a turn-based conversation between three language models, Claude, Gemini
//! and GPT, on a topic you pick. Every round each participant speaks once, always in that
//! order, after reading the last three turns of the conversation.
//!
//! The crate is layered as follows:
//!
//! * **Transcript**: [`transcript::Transcript`] is the append-only log of [`transcript::Turn`]s.
//! * **Context window**: [`context_window::derive_context`] gives each speaker the recent tail
//!   of the transcript.
//! * **Participants**: the [`participant::Participant`] trait turns a topic and a context
//!   window into a [`participant::ResponseOutcome`]. [`participant::ProviderParticipant`]
//!   backs it with a [`ClientWrapper`] and absorbs every provider failure.
//! * **Orchestration**: [`RoundOrchestrator`] drives a [`Session`] through its rounds, halting
//!   the conversation as soon as a provider reports quota or billing exhaustion.
//! * **Export**: [`export::export`] snapshots a session as a JSON document.
//!
//! ## Running a conversation
//!
//! ```rust,no_run
//! use trialogue::config::{Credentials, TrialogueConfig};
//! use trialogue::orchestrator::{RoundOutcome, Roster};
//! use trialogue::{export, RoundOrchestrator, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     trialogue::init_logger();
//!
//!     let config = TrialogueConfig::default();
//!     let roster = Roster::from_credentials(&Credentials::from_env(), &config);
//!     let orchestrator = RoundOrchestrator::new(roster, config);
//!
//!     let mut session = Session::new("The ideal morning routine")?;
//!     let mut report = orchestrator.start(&mut session).await?;
//!     while report.outcome == RoundOutcome::Completed && orchestrator.can_advance(&session) {
//!         report = orchestrator.advance(&mut session).await?;
//!     }
//!
//!     if let Some(document) = export::export(&session) {
//!         println!("{}", document.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Writing your own participant
//!
//! Anything implementing [`participant::Participant`] can take a seat in a
//! [`orchestrator::Roster`], which is how the integration tests script conversations:
//!
//! ```rust
//! use async_trait::async_trait;
//! use trialogue::context_window::ContextMessage;
//! use trialogue::participant::{Participant, ResponseOutcome};
//! use trialogue::transcript::Speaker;
//!
//! struct Echo(Speaker);
//!
//! #[async_trait]
//! impl Participant for Echo {
//!     fn speaker(&self) -> Speaker {
//!         self.0
//!     }
//!
//!     async fn respond(&self, topic: &str, _context: &[ContextMessage]) -> ResponseOutcome {
//!         ResponseOutcome::Success(format!("{} on {}", self.0, topic))
//!     }
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Diagnostics are then controlled with `RUST_LOG`, e.g. `RUST_LOG=trialogue=debug`.
///
/// ```rust
/// trialogue::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

pub mod trialogue;

// Re-exporting key items for easier external access.
pub use trialogue::client_wrapper;
pub use trialogue::client_wrapper::{ClientError, ClientWrapper, Message, Role};
pub use trialogue::clients;
pub use trialogue::config;
pub use trialogue::config::{Credentials, TrialogueConfig};
pub use trialogue::context_window;
pub use trialogue::event;
pub use trialogue::event::{ConversationEvent, ConversationLog, EventHandler};
pub use trialogue::export;
pub use trialogue::http_client_pool;
pub use trialogue::orchestrator;
pub use trialogue::orchestrator::{RoundOrchestrator, RoundState, Roster};
pub use trialogue::participant;
pub use trialogue::participant::{Participant, ResponseOutcome};
pub use trialogue::session;
pub use trialogue::session::{Session, SessionError};
pub use trialogue::topics;
pub use trialogue::transcript;
pub use trialogue::transcript::{Speaker, Transcript, Turn};
