//! Configuration for Trialogue.
//!
//! Provides the conversation limits ([`TrialogueConfig`]) and the provider
//! credentials ([`Credentials`]). Users construct both manually or from the
//! environment; no config-file parsing dependencies are required.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use trialogue::config::{TrialogueConfig, MAX_ROUNDS};
//!
//! let config = TrialogueConfig::default();
//! assert_eq!(config.max_rounds, MAX_ROUNDS);
//!
//! // Tests and batch runs usually drop the pacing delay.
//! let config = TrialogueConfig::default().with_turn_delay(Duration::ZERO);
//! assert!(config.turn_delay.is_zero());
//! ```

use crate::trialogue::transcript::Speaker;
use std::time::Duration;

/// Maximum number of rounds a session may run.
pub const MAX_ROUNDS: u32 = 10;

/// Maximum length of a turn, in characters.
pub const CHAR_LIMIT: usize = 200;

/// Number of most recent turns shown to the next participant.
pub const CONTEXT_MESSAGES: usize = 3;

/// Completion token cap sent upstream with every request.
pub const MAX_TOKENS_OUTPUT: u32 = 120;

/// Sampling temperature for the participants that accept one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Appended to a response that had to be cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Pause between two participants of the same round.
pub const DEFAULT_TURN_DELAY: Duration = Duration::from_millis(300);

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Limits applied by the orchestrator and the participants.
///
/// [`Default`] matches the module constants.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialogueConfig {
    /// Rounds after which only stopping is allowed.
    pub max_rounds: u32,
    /// Maximum characters per stored turn.
    pub char_limit: usize,
    /// Size of the context window handed to each participant.
    pub context_messages: usize,
    /// Completion token cap requested from the providers.
    pub max_output_tokens: u32,
    /// Temperature for Gemini and GPT.
    pub temperature: f32,
    /// Sleep between participants. Purely cosmetic, zero disables it.
    pub turn_delay: Duration,
}

impl Default for TrialogueConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            char_limit: CHAR_LIMIT,
            context_messages: CONTEXT_MESSAGES,
            max_output_tokens: MAX_TOKENS_OUTPUT,
            temperature: DEFAULT_TEMPERATURE,
            turn_delay: DEFAULT_TURN_DELAY,
        }
    }
}

impl TrialogueConfig {
    pub fn with_turn_delay(mut self, turn_delay: Duration) -> Self {
        self.turn_delay = turn_delay;
        self
    }

    /// Round limit, capped at [`MAX_ROUNDS`]. Zero forbids even the first round.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.min(MAX_ROUNDS);
        self
    }

    /// Turn length limit, capped at [`CHAR_LIMIT`].
    pub fn with_char_limit(mut self, char_limit: usize) -> Self {
        self.char_limit = char_limit.min(CHAR_LIMIT);
        self
    }

    /// The same config with the hard limits enforced.
    ///
    /// Fields are public, so the orchestrator and participants run every
    /// config through this before use.
    pub fn bounded(self) -> Self {
        let (max_rounds, char_limit) = (self.max_rounds, self.char_limit);
        self.with_max_rounds(max_rounds).with_char_limit(char_limit)
    }
}

/// API keys for the three providers. A missing key makes the matching
/// participant answer with a placeholder instead of calling upstream.
#[derive(Clone, Default)]
pub struct Credentials {
    pub anthropic: Option<String>,
    pub google: Option<String>,
    pub openai: Option<String>,
}

impl Credentials {
    /// Read `ANTHROPIC_API_KEY`, `GOOGLE_API_KEY` and `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from any key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            anthropic: read(ANTHROPIC_API_KEY_ENV),
            google: read(GOOGLE_API_KEY_ENV),
            openai: read(OPENAI_API_KEY_ENV),
        }
    }

    pub fn for_speaker(&self, speaker: Speaker) -> Option<&str> {
        match speaker {
            Speaker::Claude => self.anthropic.as_deref(),
            Speaker::Gemini => self.google.as_deref(),
            Speaker::Gpt => self.openai.as_deref(),
        }
    }
}

// Keys never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("anthropic", &self.anthropic.is_some())
            .field("google", &self.google.is_some())
            .field("openai", &self.openai.is_some())
            .finish()
    }
}
