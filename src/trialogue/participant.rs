//! Participant adapters: one per conversation role.
//!
//! A [`Participant`] turns `(topic, context)` into a [`ResponseOutcome`]. Every
//! provider failure is absorbed here and classified, so the orchestrator only
//! ever sees one of four outcomes:
//!
//! | Outcome | Meaning | Round continues |
//! |---|---|---|
//! | [`Success`](ResponseOutcome::Success) | upstream answered | yes |
//! | [`Unavailable`](ResponseOutcome::Unavailable) | no credential, placeholder text | yes |
//! | [`Degraded`](ResponseOutcome::Degraded) | transient failure, fallback text | yes |
//! | [`Fatal`](ResponseOutcome::Fatal) | quota / billing exhaustion | no, session halts |
//!
//! Each call makes exactly one upstream request. There are no retries.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trialogue::clients::openai::{Model, OpenAIClient};
//! use trialogue::config::TrialogueConfig;
//! use trialogue::participant::{Participant, ProviderParticipant};
//!
//! # async fn demo() {
//! let client = Arc::new(OpenAIClient::new_with_model_enum("sk-...", Model::GPT4oMini));
//! let gpt = ProviderParticipant::gpt(Some(client), &TrialogueConfig::default());
//! let outcome = gpt.respond("time management", &[]).await;
//! println!("{:?}", outcome);
//! # }
//! ```

use crate::trialogue::client_wrapper::{ClientError, ClientWrapper, GenerationParams, Message};
use crate::trialogue::config::{TrialogueConfig, CHAR_LIMIT, TRUNCATION_MARKER};
use crate::trialogue::context_window::{render_context, ContextMessage};
use crate::trialogue::transcript::Speaker;
use async_trait::async_trait;
use std::sync::Arc;

/// Result of asking one participant for its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Success(String),
    Unavailable(String),
    Degraded(String),
    Fatal,
}

/// Payload-free tag of a [`ResponseOutcome`], used in events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Unavailable,
    Degraded,
    Fatal,
}

impl ResponseOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ResponseOutcome::Success(_) => OutcomeKind::Success,
            ResponseOutcome::Unavailable(_) => OutcomeKind::Unavailable,
            ResponseOutcome::Degraded(_) => OutcomeKind::Degraded,
            ResponseOutcome::Fatal => OutcomeKind::Fatal,
        }
    }

    /// Text to append to the transcript, `None` for [`Fatal`](ResponseOutcome::Fatal).
    pub fn content(&self) -> Option<&str> {
        match self {
            ResponseOutcome::Success(content)
            | ResponseOutcome::Unavailable(content)
            | ResponseOutcome::Degraded(content) => Some(content),
            ResponseOutcome::Fatal => None,
        }
    }

    pub fn into_content(self) -> Option<String> {
        match self {
            ResponseOutcome::Success(content)
            | ResponseOutcome::Unavailable(content)
            | ResponseOutcome::Degraded(content) => Some(content),
            ResponseOutcome::Fatal => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ResponseOutcome::Fatal)
    }
}

/// One of the three conversation roles.
#[async_trait]
pub trait Participant: Send + Sync {
    fn speaker(&self) -> Speaker;

    /// Whether a usable credential is configured. Unavailable participants
    /// still answer, with a placeholder.
    fn is_available(&self) -> bool {
        true
    }

    /// Produce this participant's turn. Returned content never exceeds the
    /// configured character limit.
    async fn respond(&self, topic: &str, context: &[ContextMessage]) -> ResponseOutcome;
}

/// Cut `text` to at most `limit` characters.
///
/// Longer text keeps its first `limit - 3` characters followed by
/// [`TRUNCATION_MARKER`]. Characters are Unicode scalar values, so multi-byte
/// text is never split inside a code point.
pub fn truncate_response(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let marker_len = TRUNCATION_MARKER.chars().count();
    if limit <= marker_len {
        return text.chars().take(limit).collect();
    }
    let mut truncated: String = text.chars().take(limit - marker_len).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// How an upstream failure affects the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    /// Quota or billing exhausted: stop the whole conversation.
    Fatal,
    /// Anything else: substitute fallback text and keep going.
    Transient,
}

fn mentions_any(err: &ClientError, needles: &[&str]) -> bool {
    let text = err.to_string().to_lowercase();
    needles.iter().any(|needle| text.contains(needle))
}

fn classify_claude_failure(err: &ClientError) -> FailureClass {
    if err.status() == Some(429) || mentions_any(err, &["quota", "billing", "credit balance"]) {
        FailureClass::Fatal
    } else {
        FailureClass::Transient
    }
}

fn classify_gemini_failure(err: &ClientError) -> FailureClass {
    // Free-tier exhaustion surfaces as RESOURCE_EXHAUSTED with "quota" or "limit".
    if mentions_any(err, &["quota", "limit"]) {
        FailureClass::Fatal
    } else {
        FailureClass::Transient
    }
}

fn classify_gpt_failure(err: &ClientError) -> FailureClass {
    if err.status() == Some(429) || mentions_any(err, &["quota"]) {
        FailureClass::Fatal
    } else {
        FailureClass::Transient
    }
}

fn classify_failure(speaker: Speaker, err: &ClientError) -> FailureClass {
    match speaker {
        Speaker::Claude => classify_claude_failure(err),
        Speaker::Gemini => classify_gemini_failure(err),
        Speaker::Gpt => classify_gpt_failure(err),
    }
}

fn response_style(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::Claude => "Concise and focused on the key points",
        Speaker::Gemini => "Concise and precise",
        Speaker::Gpt => "Concise and easy to understand",
    }
}

/// Prompt sent upstream: topic, rendered context window and the length rule.
pub(crate) fn build_prompt(
    speaker: Speaker,
    topic: &str,
    context: &[ContextMessage],
    char_limit: usize,
) -> String {
    format!(
        "Topic: {topic}\n\n\
         Conversation so far:\n{context}\n\n\
         You are {name}. Respond under these conditions:\n\
         - Strictly {char_limit} characters or fewer\n\
         - {style}",
        topic = topic,
        context = render_context(context),
        name = speaker.name(),
        char_limit = char_limit,
        style = response_style(speaker),
    )
}

fn unavailable_placeholder(speaker: Speaker) -> String {
    let sample = match speaker {
        Speaker::Claude => {
            "Looking at this from a technical angle, there is an interesting challenge here."
        }
        Speaker::Gemini => "The data suggests that an efficient approach is needed.",
        Speaker::Gpt => "Combining both views, a balanced approach looks best.",
    };
    format!(
        "{} {}: No API key configured. Showing a sample response. {}",
        speaker.icon(),
        speaker.name(),
        sample
    )
}

fn degraded_fallback(speaker: Speaker, topic: &str) -> String {
    let sample = match speaker {
        Speaker::Claude => format!(
            "thinking deeply about {}, the context offers some interesting insights.",
            topic
        ),
        Speaker::Gemini => format!(
            "analyzing the data on {}, a rational solution comes into view.",
            topic
        ),
        Speaker::Gpt => format!(
            "weighing both perspectives on {}, a practical approach emerges.",
            topic
        ),
    };
    format!(
        "{} {}: An error occurred. Sample response: {}",
        speaker.icon(),
        speaker.name(),
        sample
    )
}

/// A participant backed by a [`ClientWrapper`].
///
/// Without a client the participant is [unavailable](Participant::is_available)
/// and answers with a labeled placeholder.
pub struct ProviderParticipant {
    speaker: Speaker,
    client: Option<Arc<dyn ClientWrapper>>,
    char_limit: usize,
    params: GenerationParams,
}

impl ProviderParticipant {
    /// Build a participant with the request parameters the provider expects:
    /// every provider gets the output token cap, Gemini and GPT also get a
    /// temperature.
    pub fn new(
        speaker: Speaker,
        client: Option<Arc<dyn ClientWrapper>>,
        config: &TrialogueConfig,
    ) -> Self {
        let temperature = match speaker {
            Speaker::Claude => None,
            Speaker::Gemini | Speaker::Gpt => Some(config.temperature),
        };
        Self {
            speaker,
            client,
            char_limit: config.char_limit.min(CHAR_LIMIT),
            params: GenerationParams {
                max_tokens: Some(config.max_output_tokens),
                temperature,
            },
        }
    }

    pub fn claude(client: Option<Arc<dyn ClientWrapper>>, config: &TrialogueConfig) -> Self {
        Self::new(Speaker::Claude, client, config)
    }

    pub fn gemini(client: Option<Arc<dyn ClientWrapper>>, config: &TrialogueConfig) -> Self {
        Self::new(Speaker::Gemini, client, config)
    }

    pub fn gpt(client: Option<Arc<dyn ClientWrapper>>, config: &TrialogueConfig) -> Self {
        Self::new(Speaker::Gpt, client, config)
    }

    pub fn generation_params(&self) -> &GenerationParams {
        &self.params
    }
}

#[async_trait]
impl Participant for ProviderParticipant {
    fn speaker(&self) -> Speaker {
        self.speaker
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    async fn respond(&self, topic: &str, context: &[ContextMessage]) -> ResponseOutcome {
        let client = match &self.client {
            Some(client) => client,
            None => {
                return ResponseOutcome::Unavailable(truncate_response(
                    &unavailable_placeholder(self.speaker),
                    self.char_limit,
                ))
            }
        };

        let prompt = build_prompt(self.speaker, topic, context, self.char_limit);
        let result = client
            .send_message(&[Message::user(prompt)], Some(self.params.clone()))
            .await;

        match result {
            Ok(reply) => {
                let text = reply.content.trim();
                if text.is_empty() {
                    log::warn!("{} returned an empty reply, using fallback", self.speaker);
                    ResponseOutcome::Degraded(truncate_response(
                        &degraded_fallback(self.speaker, topic),
                        self.char_limit,
                    ))
                } else {
                    ResponseOutcome::Success(truncate_response(text, self.char_limit))
                }
            }
            Err(err) => match classify_failure(self.speaker, &err) {
                FailureClass::Fatal => {
                    log::warn!("{} is out of quota, ending the conversation: {}", self.speaker, err);
                    ResponseOutcome::Fatal
                }
                FailureClass::Transient => {
                    log::warn!("{} failed, using fallback: {}", self.speaker, err);
                    ResponseOutcome::Degraded(truncate_response(
                        &degraded_fallback(self.speaker, topic),
                        self.char_limit,
                    ))
                }
            },
        }
    }
}
