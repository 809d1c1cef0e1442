//! A conversation session: topic, round counter, lifecycle flag and transcript.
//!
//! Sessions are plain values owned by the caller and lent to the
//! [`RoundOrchestrator`](crate::orchestrator::RoundOrchestrator) by `&mut`
//! reference, so only the orchestrator mutates the transcript while a round
//! runs. Everything else reads through accessors.

use crate::trialogue::orchestrator::RoundState;
use crate::trialogue::transcript::Transcript;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use uuid::Uuid;

/// Error types for session and orchestrator operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The topic was empty or only whitespace.
    EmptyTopic,
    /// The session was halted or stopped; only a reset makes it usable again.
    Inactive,
    /// The requested transition does not start from the current state.
    InvalidState {
        expected: &'static str,
        actual: RoundState,
    },
    /// The round limit was reached, the only remaining option is to stop.
    MaxRoundsReached { max_rounds: u32 },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyTopic => write!(f, "Topic must not be empty"),
            SessionError::Inactive => write!(f, "Session is no longer active"),
            SessionError::InvalidState { expected, actual } => {
                write!(f, "Invalid state: expected {}, found {:?}", expected, actual)
            }
            SessionError::MaxRoundsReached { max_rounds } => {
                write!(f, "Maximum of {} rounds reached", max_rounds)
            }
        }
    }
}

impl Error for SessionError {}

/// Status snapshot of a session, also recorded when a session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub topic: String,
    pub rounds: u32,
    pub messages: usize,
    pub timestamp: DateTime<Utc>,
}

/// One conversation on one topic.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    topic: String,
    current_round: u32,
    active: bool,
    state: RoundState,
    transcript: Transcript,
}

fn short_id() -> String {
    Uuid::new_v4().to_string().chars().take(8).collect()
}

impl Session {
    /// Open a session for `topic`. Surrounding whitespace is dropped.
    pub fn new(topic: impl AsRef<str>) -> Result<Self, SessionError> {
        let topic = topic.as_ref().trim();
        if topic.is_empty() {
            return Err(SessionError::EmptyTopic);
        }
        Ok(Self {
            id: short_id(),
            topic: topic.to_string(),
            current_round: 0,
            active: true,
            state: RoundState::Idle,
            transcript: Transcript::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Number of the round in progress or last run; 0 before the first round.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.clone(),
            topic: self.topic.clone(),
            rounds: self.current_round,
            messages: self.transcript.len(),
            timestamp: Utc::now(),
        }
    }

    /// Discard the transcript and counters and start over on the same topic.
    ///
    /// The session gets a fresh id and is active and idle again, whatever state
    /// it was in before.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.current_round = 0;
        self.state = RoundState::Idle;
        self.active = true;
        self.id = short_id();
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub(crate) fn set_state(&mut self, state: RoundState) {
        self.state = state;
    }

    pub(crate) fn set_current_round(&mut self, round: u32) {
        self.current_round = round;
    }

    pub(crate) fn deactivate(&mut self, state: RoundState) {
        self.active = false;
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle_and_active() {
        let session = Session::new("  remote work  ").unwrap();
        assert_eq!(session.topic(), "remote work");
        assert_eq!(session.current_round(), 0);
        assert!(session.is_active());
        assert_eq!(session.state(), RoundState::Idle);
        assert_eq!(session.id().len(), 8);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn blank_topic_is_rejected() {
        assert_eq!(Session::new("   ").unwrap_err(), SessionError::EmptyTopic);
    }

    #[test]
    fn ids_differ_between_sessions() {
        let a = Session::new("a").unwrap();
        let b = Session::new("b").unwrap();
        assert_ne!(a.id(), b.id());
    }
}
