//! Round-robin orchestration of the three participants.
//!
//! The orchestrator drives a [`Session`] through a small state machine:
//!
//! ```text
//!            start                    all three non-fatal
//!   Idle ──────────────> RunningRound ───────────────────> RoundComplete
//!                          │    ^                            │   │
//!                   Fatal  │    └──────── advance ───────────┘   │ stop
//!                          v      (current_round < max_rounds)   v
//!                        Halted                               Stopped
//! ```
//!
//! Within a round the participants speak strictly in the order Claude,
//! Gemini, GPT. Each one sees the last few turns of the transcript, produced by
//! [`derive_context_with_limit`]. The first fatal outcome ends the round on the
//! spot; turns already appended in that round stay in the transcript.
//! `Halted` and `Stopped` are terminal until [`Session::reset`].
//!
//! # Example
//!
//! ```rust,no_run
//! use trialogue::config::{Credentials, TrialogueConfig};
//! use trialogue::orchestrator::{Roster, RoundOrchestrator};
//! use trialogue::session::Session;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrialogueConfig::default();
//! let roster = Roster::from_credentials(&Credentials::from_env(), &config);
//! let orchestrator = RoundOrchestrator::new(roster, config);
//!
//! let mut session = Session::new("time management")?;
//! let report = orchestrator.start(&mut session).await?;
//! println!("round {} produced {} turns", report.round, report.turns.len());
//!
//! while orchestrator.can_advance(&session) {
//!     orchestrator.advance(&mut session).await?;
//! }
//! if session.is_active() {
//!     orchestrator.stop(&mut session).await?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::trialogue::client_wrapper::ClientWrapper;
use crate::trialogue::clients::claude::{self, ClaudeClient};
use crate::trialogue::clients::gemini::{self, GeminiClient};
use crate::trialogue::clients::openai::{self, OpenAIClient};
use crate::trialogue::config::{Credentials, TrialogueConfig};
use crate::trialogue::context_window::derive_context_with_limit;
use crate::trialogue::event::{ConversationEvent, EndReason, EventHandler};
use crate::trialogue::participant::{Participant, ProviderParticipant};
use crate::trialogue::session::{Session, SessionError, SessionSummary};
use crate::trialogue::transcript::{Speaker, Turn};
use serde::Serialize;
use std::sync::Arc;

/// Where a session stands in the round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundState {
    /// No round has run yet.
    Idle,
    /// Participants of the current round are being called.
    RunningRound,
    /// Every participant of the current round answered.
    RoundComplete,
    /// A fatal outcome ended the session.
    Halted,
    /// The caller ended the session.
    Stopped,
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Completed,
    /// `speaker` returned a fatal outcome; later speakers were not called.
    Halted { speaker: Speaker },
}

/// Turns produced by one round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: u32,
    pub turns: Vec<Turn>,
    pub outcome: RoundOutcome,
}

/// The three participants in speaking order.
pub struct Roster {
    participants: Vec<(Speaker, Box<dyn Participant>)>,
}

impl Roster {
    /// Seat the three participants. Turns are tagged with the seat's speaker,
    /// so argument order defines the speaking order.
    pub fn new(
        claude: Box<dyn Participant>,
        gemini: Box<dyn Participant>,
        gpt: Box<dyn Participant>,
    ) -> Self {
        let participants: Vec<(Speaker, Box<dyn Participant>)> =
            Speaker::ORDER.iter().copied().zip([claude, gemini, gpt]).collect();
        for (seat, participant) in &participants {
            if participant.speaker() != *seat {
                log::warn!(
                    "participant reporting {} seated as {}",
                    participant.speaker(),
                    seat
                );
            }
        }
        Self { participants }
    }

    /// Build provider-backed participants with the default models. A missing
    /// key leaves that participant without a client.
    pub fn from_credentials(credentials: &Credentials, config: &TrialogueConfig) -> Self {
        let claude_client = credentials.anthropic.as_deref().map(|key| {
            Arc::new(ClaudeClient::new_with_model_enum(key, claude::Model::ClaudeHaiku3))
                as Arc<dyn ClientWrapper>
        });
        let gemini_client = credentials.google.as_deref().map(|key| {
            Arc::new(GeminiClient::new_with_model_enum(key, gemini::Model::Gemini20Flash))
                as Arc<dyn ClientWrapper>
        });
        let gpt_client = credentials.openai.as_deref().map(|key| {
            Arc::new(OpenAIClient::new_with_model_enum(key, openai::Model::GPT4oMini))
                as Arc<dyn ClientWrapper>
        });

        Self::new(
            Box::new(ProviderParticipant::claude(claude_client, config)),
            Box::new(ProviderParticipant::gemini(gemini_client, config)),
            Box::new(ProviderParticipant::gpt(gpt_client, config)),
        )
    }

    /// Credential status per speaker, in speaking order.
    pub fn availability(&self) -> Vec<(Speaker, bool)> {
        self.participants
            .iter()
            .map(|(speaker, participant)| (*speaker, participant.is_available()))
            .collect()
    }
}

/// Runs rounds over sessions. Holds no per-session state, so one orchestrator
/// can serve any number of sessions one at a time.
pub struct RoundOrchestrator {
    roster: Roster,
    config: TrialogueConfig,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl RoundOrchestrator {
    /// `config` is [bounded](TrialogueConfig::bounded) first, so no session
    /// ever runs past [`MAX_ROUNDS`](crate::config::MAX_ROUNDS).
    pub fn new(roster: Roster, config: TrialogueConfig) -> Self {
        Self {
            roster,
            config: config.bounded(),
            event_handler: None,
        }
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn config(&self) -> &TrialogueConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    async fn emit(&self, event: ConversationEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_conversation_event(&event).await;
        }
    }

    /// Run round 1 of an idle session.
    pub async fn start(&self, session: &mut Session) -> Result<RoundReport, SessionError> {
        if !session.is_active() {
            return Err(SessionError::Inactive);
        }
        if session.state() != RoundState::Idle {
            return Err(SessionError::InvalidState {
                expected: "Idle",
                actual: session.state(),
            });
        }
        if self.config.max_rounds == 0 {
            return Err(SessionError::MaxRoundsReached { max_rounds: 0 });
        }
        session.set_current_round(1);
        Ok(self.run_round(session).await)
    }

    /// Whether [`advance`](Self::advance) would be accepted.
    pub fn can_advance(&self, session: &Session) -> bool {
        session.is_active()
            && session.state() == RoundState::RoundComplete
            && session.current_round() < self.config.max_rounds
    }

    /// Move to the next round and run it.
    pub async fn advance(&self, session: &mut Session) -> Result<RoundReport, SessionError> {
        if !session.is_active() {
            return Err(SessionError::Inactive);
        }
        if session.state() != RoundState::RoundComplete {
            return Err(SessionError::InvalidState {
                expected: "RoundComplete",
                actual: session.state(),
            });
        }
        if session.current_round() >= self.config.max_rounds {
            return Err(SessionError::MaxRoundsReached {
                max_rounds: self.config.max_rounds,
            });
        }
        session.set_current_round(session.current_round() + 1);
        Ok(self.run_round(session).await)
    }

    /// End an active session between rounds.
    pub async fn stop(&self, session: &mut Session) -> Result<SessionSummary, SessionError> {
        if !session.is_active() {
            return Err(SessionError::Inactive);
        }
        match session.state() {
            RoundState::Idle | RoundState::RoundComplete => {}
            actual => {
                return Err(SessionError::InvalidState {
                    expected: "Idle or RoundComplete",
                    actual,
                })
            }
        }
        session.deactivate(RoundState::Stopped);
        let summary = session.summary();
        log::info!(
            "session {} stopped after {} rounds",
            summary.session_id,
            summary.rounds
        );
        self.emit(ConversationEvent::SessionEnded {
            summary: summary.clone(),
            reason: EndReason::Stopped,
        })
        .await;
        Ok(summary)
    }

    async fn run_round(&self, session: &mut Session) -> RoundReport {
        let round = session.current_round();
        session.set_state(RoundState::RunningRound);
        log::info!("session {}: round {} started", session.id(), round);
        self.emit(ConversationEvent::RoundStarted {
            session_id: session.id().to_string(),
            round,
        })
        .await;

        let mut turns = Vec::with_capacity(self.roster.participants.len());

        for (index, (speaker, participant)) in self.roster.participants.iter().enumerate() {
            if index > 0 && !self.config.turn_delay.is_zero() {
                tokio::time::sleep(self.config.turn_delay).await;
            }

            let context = derive_context_with_limit(session.transcript(), self.config.context_messages);
            let outcome = participant.respond(session.topic(), &context).await;
            let kind = outcome.kind();

            let content = match outcome.into_content() {
                Some(content) => content,
                None => {
                    self.emit(ConversationEvent::ParticipantResponded {
                        session_id: session.id().to_string(),
                        round,
                        speaker: *speaker,
                        outcome: kind,
                        content_length: 0,
                    })
                    .await;
                    return self.halt(session, round, *speaker, turns).await;
                }
            };

            self.emit(ConversationEvent::ParticipantResponded {
                session_id: session.id().to_string(),
                round,
                speaker: *speaker,
                outcome: kind,
                content_length: content.chars().count(),
            })
            .await;

            let turn = Turn::new(round, *speaker, content);
            session.transcript_mut().append(turn.clone());
            turns.push(turn);
        }

        session.set_state(RoundState::RoundComplete);
        log::info!("session {}: round {} complete", session.id(), round);
        self.emit(ConversationEvent::RoundCompleted {
            session_id: session.id().to_string(),
            round,
            messages: session.transcript().len(),
        })
        .await;

        RoundReport {
            round,
            turns,
            outcome: RoundOutcome::Completed,
        }
    }

    async fn halt(
        &self,
        session: &mut Session,
        round: u32,
        speaker: Speaker,
        turns: Vec<Turn>,
    ) -> RoundReport {
        session.deactivate(RoundState::Halted);
        log::warn!(
            "session {}: halted in round {} by {}",
            session.id(),
            round,
            speaker
        );
        self.emit(ConversationEvent::SessionHalted {
            session_id: session.id().to_string(),
            round,
            speaker,
        })
        .await;
        self.emit(ConversationEvent::SessionEnded {
            summary: session.summary(),
            reason: EndReason::Halted,
        })
        .await;

        RoundReport {
            round,
            turns,
            outcome: RoundOutcome::Halted { speaker },
        }
    }
}
