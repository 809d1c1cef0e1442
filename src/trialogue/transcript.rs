//! The append-only conversation log of a session.
//!
//! A [`Transcript`] holds [`Turn`]s in round-major order, and within a round in
//! the fixed speaking order Claude, Gemini, GPT. Turns are immutable once
//! appended; the only way to shrink a transcript is to reset the session that
//! owns it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three fixed conversation roles, in speaking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "Claude")]
    Claude,
    #[serde(rename = "Gemini")]
    Gemini,
    #[serde(rename = "GPT")]
    Gpt,
}

impl Speaker {
    /// Speaking order within every round.
    pub const ORDER: [Speaker; 3] = [Speaker::Claude, Speaker::Gemini, Speaker::Gpt];

    pub fn name(&self) -> &'static str {
        match self {
            Speaker::Claude => "Claude",
            Speaker::Gemini => "Gemini",
            Speaker::Gpt => "GPT",
        }
    }

    /// Display glyph stored with each turn.
    pub fn icon(&self) -> &'static str {
        match self {
            Speaker::Claude => "🔥",
            Speaker::Gemini => "💎",
            Speaker::Gpt => "⚙️",
        }
    }

    /// Zero-based slot in [`Speaker::ORDER`].
    pub fn position(&self) -> usize {
        match self {
            Speaker::Claude => 0,
            Speaker::Gemini => 1,
            Speaker::Gpt => 2,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single participant's contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    round: u32,
    speaker: Speaker,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(rename = "icon")]
    marker: String,
}

impl Turn {
    /// Create a turn stamped with the current time and the speaker's glyph.
    pub fn new(round: u32, speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            round,
            speaker,
            content: content.into(),
            timestamp: Utc::now(),
            marker: speaker.icon().to_string(),
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Position of this turn in the global order (round, then speaker).
    fn sequence_key(&self) -> (u32, usize) {
        (self.round, self.speaker.position())
    }
}

/// Ordered, append-only list of turns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a turn at the end of the log.
    ///
    /// Callers append in round-major, speaker-minor order; a turn that would
    /// sort before the current tail is a logic error.
    pub fn append(&mut self, turn: Turn) {
        debug_assert!(
            self.turns
                .last()
                .map_or(true, |last| last.sequence_key() < turn.sequence_key()),
            "turn {:?} appended out of order",
            turn.sequence_key()
        );
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// The `n` most recent turns, oldest first.
    pub fn last_n(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// All turns tagged with `round`.
    pub fn round_turns(&self, round: u32) -> Vec<&Turn> {
        self.turns.iter().filter(|turn| turn.round == round).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
