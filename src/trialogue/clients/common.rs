//! Shared Chat Completions transport used by every provider client.
//!
//! OpenAI, Anthropic and Google all expose an OpenAI compatible
//! `POST {base_url}/chat/completions` endpoint, so a single request/response
//! shape covers the three participants.

use crate::trialogue::client_wrapper::{ClientError, GenerationParams, Message, TokenUsage};
use crate::trialogue::http_client_pool::get_http_client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Connection details for one OpenAI compatible endpoint.
pub struct ChatCompletionsApi {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl ChatCompletionsApi {
    pub fn new(secret_key: &str, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = match get_http_client(&base_url) {
            Ok(client) => client,
            Err(err) => {
                log::warn!(
                    "trialogue::clients::common: falling back to a default HTTP client for {}: {}",
                    base_url,
                    err
                );
                reqwest::Client::new()
            }
        };
        ChatCompletionsApi {
            http,
            base_url,
            secret_key: secret_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
    #[serde(default)]
    total_tokens: usize,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl ErrorBody {
    fn describe(self) -> Option<String> {
        let parts: Vec<String> = [self.kind, self.status, self.message]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(": "))
        }
    }
}

/// Pull a human readable message out of a provider error body.
///
/// OpenAI and Anthropic answer `{"error": {...}}`, Google sometimes wraps the
/// same object in a one-element array. Anything else is returned verbatim.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.describe() {
            return message;
        }
    }
    if let Ok(mut envelopes) = serde_json::from_str::<Vec<ErrorEnvelope>>(body) {
        if !envelopes.is_empty() {
            if let Some(message) = envelopes.remove(0).error.describe() {
                return message;
            }
        }
    }
    body.trim().to_string()
}

/// Turn a successful response body into the assistant text plus usage.
pub(crate) fn parse_completion(body: &str) -> Result<(String, Option<TokenUsage>), ClientError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|err| ClientError::InvalidResponse(err.to_string()))?;

    let usage = response.usage.map(|usage| TokenUsage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
    });

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::InvalidResponse("response contained no choices".into()))?
        .message
        .content
        .unwrap_or_default();

    Ok((content, usage))
}

/// Send a chat request, record its usage, and return the assistant's content.
pub async fn send_and_track(
    api: &ChatCompletionsApi,
    model: &str,
    messages: &[Message],
    params: Option<GenerationParams>,
    usage_slot: &Mutex<Option<TokenUsage>>,
) -> Result<String, ClientError> {
    let params = params.unwrap_or_default();
    let request = ChatRequest {
        model,
        messages: messages
            .iter()
            .map(|msg| ChatMessage {
                role: msg.role.as_str(),
                content: msg.content.as_ref(),
            })
            .collect(),
        max_tokens: params.max_tokens,
        temperature: params.temperature,
    };

    let response = api
        .http
        .post(api.completions_url())
        .bearer_auth(&api.secret_key)
        .json(&request)
        .send()
        .await
        .map_err(|err| ClientError::Transport(err.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| ClientError::Transport(err.to_string()))?;

    if !status.is_success() {
        let err = ClientError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        };
        log::error!(
            "trialogue::clients::common::send_and_track(...): {} returned {}",
            api.base_url(),
            err
        );
        return Err(err);
    }

    let (content, usage) = parse_completion(&body)?;
    *usage_slot.lock().await = usage;
    Ok(content)
}
