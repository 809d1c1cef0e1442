//! Bounded context handed to a participant before it speaks.
//!
//! The window is the last few turns of the whole transcript, regardless of
//! round boundaries. Keeping it fixed-size bounds prompt cost and keeps every
//! provider grounded on the same slice of the conversation.

use crate::trialogue::config::CONTEXT_MESSAGES;
use crate::trialogue::transcript::{Speaker, Transcript};

/// One prior turn as seen by the next participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMessage {
    pub speaker: Speaker,
    pub content: String,
}

impl ContextMessage {
    /// `"speaker: content"` line used in prompts.
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker.name(), self.content)
    }
}

/// The last [`CONTEXT_MESSAGES`] turns of `transcript`, oldest first.
pub fn derive_context(transcript: &Transcript) -> Vec<ContextMessage> {
    derive_context_with_limit(transcript, CONTEXT_MESSAGES)
}

/// The last `limit` turns of `transcript`, oldest first.
pub fn derive_context_with_limit(transcript: &Transcript, limit: usize) -> Vec<ContextMessage> {
    transcript
        .last_n(limit)
        .iter()
        .map(|turn| ContextMessage {
            speaker: turn.speaker(),
            content: turn.content().to_string(),
        })
        .collect()
}

/// Render a window as newline separated `"speaker: content"` lines.
pub fn render_context(context: &[ContextMessage]) -> String {
    context
        .iter()
        .map(ContextMessage::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trialogue::transcript::Turn;

    fn filled(rounds: u32) -> Transcript {
        let mut transcript = Transcript::new();
        for round in 1..=rounds {
            for speaker in Speaker::ORDER {
                transcript.append(Turn::new(round, speaker, format!("{} r{}", speaker, round)));
            }
        }
        transcript
    }

    #[test]
    fn empty_transcript_gives_empty_window() {
        assert!(derive_context(&Transcript::new()).is_empty());
        assert_eq!(render_context(&[]), "");
    }

    #[test]
    fn window_crosses_round_boundaries() {
        let mut transcript = filled(1);
        transcript.append(Turn::new(2, Speaker::Claude, "Claude r2"));

        let window = derive_context(&transcript);
        let lines: Vec<String> = window.iter().map(ContextMessage::render).collect();
        assert_eq!(lines, vec!["Gemini: Gemini r1", "GPT: GPT r1", "Claude: Claude r2"]);
    }

    #[test]
    fn long_transcript_keeps_only_the_tail() {
        let transcript = filled(9);
        assert_eq!(transcript.len(), 27);

        let window = derive_context(&transcript);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "Claude r9");
        assert_eq!(window[2].content, "GPT r9");
    }

    #[test]
    fn custom_limit_is_honored() {
        let transcript = filled(2);
        assert_eq!(derive_context_with_limit(&transcript, 5).len(), 5);
        assert_eq!(derive_context_with_limit(&transcript, 50).len(), 6);
    }
}
