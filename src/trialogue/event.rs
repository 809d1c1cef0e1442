//! Conversation event system.
//!
//! Provides a callback-based observability layer for the round orchestrator.
//! Implement [`EventHandler`] to receive notifications about:
//!
//! - **Round boundaries**: when a round starts and completes
//! - **Participant outcomes**: which outcome each speaker produced
//! - **Terminal transitions**: a halt caused by a fatal outcome, or an explicit stop
//!
//! # Event Flow (one complete round, then a stop)
//!
//! ```text
//! RoundStarted { round: 1 }
//!   ├─ ParticipantResponded { speaker: Claude, outcome: Success }
//!   ├─ ParticipantResponded { speaker: Gemini, outcome: Degraded }
//!   └─ ParticipantResponded { speaker: GPT, outcome: Success }
//! RoundCompleted { round: 1 }
//! SessionEnded { reason: Stopped }
//! ```
//!
//! A fatal outcome replaces the rest of the round with
//! `SessionHalted` followed by `SessionEnded { reason: Halted }`.
//! `SessionEnded` fires exactly once per session lifetime.
//!
//! # Example
//!
//! ```rust,no_run
//! use trialogue::event::{ConversationEvent, EventHandler};
//! use async_trait::async_trait;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl EventHandler for Printer {
//!     async fn on_conversation_event(&self, event: &ConversationEvent) {
//!         if let ConversationEvent::ParticipantResponded { speaker, outcome, .. } = event {
//!             println!("{} -> {:?}", speaker, outcome);
//!         }
//!     }
//! }
//! ```

use crate::trialogue::participant::OutcomeKind;
use crate::trialogue::session::SessionSummary;
use crate::trialogue::transcript::Speaker;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Why a session stopped accepting rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A participant returned a fatal outcome.
    Halted,
    /// The caller stopped the conversation.
    Stopped,
}

/// Events emitted by a [`RoundOrchestrator`](crate::orchestrator::RoundOrchestrator).
///
/// Every variant carries the `session_id` so a single handler can follow
/// several sessions.
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    /// A round is about to call its participants.
    RoundStarted {
        session_id: String,
        /// 1-based round number.
        round: u32,
    },

    /// A participant returned a non-fatal or fatal outcome.
    ParticipantResponded {
        session_id: String,
        round: u32,
        speaker: Speaker,
        outcome: OutcomeKind,
        /// Characters appended to the transcript, 0 for a fatal outcome.
        content_length: usize,
    },

    /// All three participants spoke.
    RoundCompleted {
        session_id: String,
        round: u32,
        /// Transcript length after the round.
        messages: usize,
    },

    /// A fatal outcome stopped the round mid-way.
    SessionHalted {
        session_id: String,
        round: u32,
        speaker: Speaker,
    },

    /// The session reached a terminal state.
    SessionEnded {
        summary: SessionSummary,
        reason: EndReason,
    },
}

/// Receiver for [`ConversationEvent`]s. The default implementation ignores
/// everything, override what you need.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_conversation_event(&self, _event: &ConversationEvent) {}
}

/// Writes every event to the `log` facade.
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn on_conversation_event(&self, event: &ConversationEvent) {
        match event {
            ConversationEvent::SessionEnded { summary, reason } => {
                log::info!(
                    "session {} ended ({:?}): topic={:?} rounds={} messages={}",
                    summary.session_id,
                    reason,
                    summary.topic,
                    summary.rounds,
                    summary.messages
                );
            }
            other => log::debug!("{:?}", other),
        }
    }
}

/// In-memory record of ended sessions, one summary per terminal transition.
#[derive(Default)]
pub struct ConversationLog {
    entries: Mutex<Vec<(SessionSummary, EndReason)>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<(SessionSummary, EndReason)> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl EventHandler for ConversationLog {
    async fn on_conversation_event(&self, event: &ConversationEvent) {
        if let ConversationEvent::SessionEnded { summary, reason } = event {
            self.entries.lock().await.push((summary.clone(), *reason));
        }
    }
}
