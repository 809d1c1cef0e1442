//! Anthropic Claude client wrapper built on the OpenAI-compatible transport.
//!
//! The wrapper delegates HTTP concerns to [`OpenAIClient`], so swapping from
//! OpenAI to Claude only requires a different constructor.

use crate::trialogue::client_wrapper::{
    ClientError, ClientWrapper, GenerationParams, Message, TokenUsage,
};
use crate::trialogue::clients::openai::OpenAIClient;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Anthropic's OpenAI compatible endpoint.
pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Client wrapper for Anthropic's Claude API routed through the OpenAI compatible surface.
pub struct ClaudeClient {
    /// Delegated client that handles the HTTP interactions.
    delegate_client: OpenAIClient,
    /// Exposed model name.
    model: String,
}

/// Claude models suited to short conversational turns.
pub enum Model {
    /// `claude-3-haiku-20240307` – the fast, inexpensive Haiku 3 tier.
    ClaudeHaiku3,
    /// `claude-3-5-haiku-latest` – Haiku 3.5.
    ClaudeHaiku35,
    /// `claude-haiku-4-5` – Haiku 4.5.
    ClaudeHaiku45,
    /// `claude-sonnet-4-5` – Sonnet 4.5.
    ClaudeSonnet45,
}

/// Convert a [`Model`] variant into its public string identifier.
fn model_to_string(model: Model) -> String {
    match model {
        Model::ClaudeHaiku3 => "claude-3-haiku-20240307".to_string(),
        Model::ClaudeHaiku35 => "claude-3-5-haiku-latest".to_string(),
        Model::ClaudeHaiku45 => "claude-haiku-4-5".to_string(),
        Model::ClaudeSonnet45 => "claude-sonnet-4-5".to_string(),
    }
}

impl ClaudeClient {
    /// Create a client from an API key and strongly typed model variant.
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_str(secret_key, &model_to_string(model))
    }

    /// Create a client from an API key and explicit model string.
    pub fn new_with_model_str(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, CLAUDE_BASE_URL)
    }

    /// Create a client pointing at a custom Claude-compatible base URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        ClaudeClient {
            // we reuse the OpenAIClient for Claude and delegate the calls to it
            delegate_client: OpenAIClient::new_with_base_url(secret_key, model_name, base_url),
            model: model_name.to_string(),
        }
    }
}

#[async_trait]
impl ClientWrapper for ClaudeClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(
        &self,
        messages: &[Message],
        params: Option<GenerationParams>,
    ) -> Result<Message, ClientError> {
        self.delegate_client.send_message(messages, params).await
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        self.delegate_client.usage_slot()
    }
}
