//! A ClientWrapper is a wrapper around a specific cloud LLM service.
//! It provides a common interface to interact with the LLMs.
//! It does not keep track of the conversation, that is the job of the
//! [`Transcript`](crate::transcript::Transcript) owned by a
//! [`Session`](crate::session::Session).

use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Represents the possible roles for a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    System,
    // a message sent by the orchestrator on behalf of the app
    User,
    // lets the model know the content was generated as a response to a user message
    Assistant,
}

impl Role {
    /// Wire name used by Chat Completions style APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// How many tokens were spent on prompt vs. completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

/// Represents a generic message to be sent to an LLM.
#[derive(Clone, Debug)]
pub struct Message {
    /// The role associated with the message.
    pub role: Role,
    /// The actual content of the message.
    pub content: Arc<str>,
}

impl Message {
    pub fn user(content: impl AsRef<str>) -> Self {
        Message {
            role: Role::User,
            content: Arc::from(content.as_ref()),
        }
    }
}

/// Sampling knobs forwarded with a single request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on completion tokens.
    pub max_tokens: Option<u32>,
    /// Sampling temperature, `None` leaves the provider default.
    pub temperature: Option<f32>,
}

/// Failure of a single upstream call.
///
/// Participants classify these into conversation outcomes, so the variants keep
/// just enough detail (HTTP status and provider message) for that decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The provider answered with a non-success HTTP status.
    Api { status: u16, message: String },
    /// The request never produced a response (DNS, TLS, timeout, ...).
    Transport(String),
    /// The response body could not be understood.
    InvalidResponse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Api { status, message } => {
                write!(f, "API error (HTTP {}): {}", status, message)
            }
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl Error for ClientError {}

/// Trait defining the interface to interact with various LLM services.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Name of the model requests are sent to.
    fn model_name(&self) -> &str;

    /// Send a message to the LLM and get a response.
    /// - `messages`: The messages to send in the request.
    /// - `params`: optional sampling overrides for this request.
    async fn send_message(
        &self,
        messages: &[Message],
        params: Option<GenerationParams>,
    ) -> Result<Message, ClientError>;

    /// Hook to retrieve usage from the *last* send_message() call.
    /// Default impl reads [`usage_slot`](ClientWrapper::usage_slot).
    async fn get_last_usage(&self) -> Option<TokenUsage> {
        match self.usage_slot() {
            Some(slot) => slot.lock().await.clone(),
            None => None,
        }
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        // Clients supporting TokenUsage tracking override this.
        None
    }
}
