use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use trialogue::client_wrapper::{
    ClientError, ClientWrapper, GenerationParams, Message, Role, TokenUsage,
};
use trialogue::config::{Credentials, TrialogueConfig};
use trialogue::context_window::ContextMessage;
use trialogue::orchestrator::{RoundOrchestrator, RoundOutcome, RoundState, Roster};
use trialogue::participant::{OutcomeKind, Participant, ProviderParticipant, ResponseOutcome};
use trialogue::session::Session;
use trialogue::transcript::Speaker;

struct SequencedMockClient {
    responses: Mutex<VecDeque<Result<String, ClientError>>>,
    requests: Mutex<Vec<(Vec<(Role, String)>, Option<GenerationParams>)>>,
    usage: Mutex<Option<TokenUsage>>,
}

impl SequencedMockClient {
    fn new(responses: Vec<Result<String, ClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            usage: Mutex::new(None),
        }
    }

    async fn requests(&self) -> Vec<(Vec<(Role, String)>, Option<GenerationParams>)> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ClientWrapper for SequencedMockClient {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn send_message(
        &self,
        messages: &[Message],
        params: Option<GenerationParams>,
    ) -> Result<Message, ClientError> {
        let snapshot = messages
            .iter()
            .map(|m| (m.role.clone(), m.content.to_string()))
            .collect();
        self.requests.lock().await.push((snapshot, params));

        let reply = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("default reply".to_string()))?;

        let output_tokens = reply.split_whitespace().count();
        *self.usage.lock().await = Some(TokenUsage {
            input_tokens: 10,
            output_tokens,
            total_tokens: 10 + output_tokens,
        });

        Ok(Message {
            role: Role::Assistant,
            content: Arc::<str>::from(reply),
        })
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.usage)
    }
}

fn make_client(responses: Vec<Result<&str, ClientError>>) -> Arc<SequencedMockClient> {
    Arc::new(SequencedMockClient::new(
        responses
            .into_iter()
            .map(|r| r.map(|s| s.to_string()))
            .collect(),
    ))
}

fn dyn_client(client: &Arc<SequencedMockClient>) -> Arc<dyn ClientWrapper> {
    client.clone()
}

fn api(status: u16, message: &str) -> ClientError {
    ClientError::Api {
        status,
        message: message.to_string(),
    }
}

fn config() -> TrialogueConfig {
    TrialogueConfig::default().with_turn_delay(Duration::ZERO)
}

#[tokio::test]
async fn success_is_truncated_to_the_character_limit() {
    let long = "a".repeat(250);
    let client = make_client(vec![Ok(long.as_str())]);
    let gpt = ProviderParticipant::gpt(Some(dyn_client(&client)), &config());

    let outcome = gpt.respond("remote work", &[]).await;

    let content = match outcome {
        ResponseOutcome::Success(content) => content,
        other => panic!("expected success, got {:?}", other),
    };
    assert_eq!(content.chars().count(), 200);
    assert_eq!(content, format!("{}...", "a".repeat(197)));
    assert_eq!(client.get_last_usage().await.map(|u| u.output_tokens), Some(1));
}

#[tokio::test]
async fn prompt_and_params_are_sent_in_one_request() {
    let client = make_client(vec![Ok("Short and sweet.")]);
    let gemini = ProviderParticipant::gemini(Some(dyn_client(&client)), &config());
    let context = vec![ContextMessage {
        speaker: Speaker::Claude,
        content: "Start with the hardest task.".into(),
    }];

    let outcome = gemini.respond("time management", &context).await;
    assert_eq!(outcome, ResponseOutcome::Success("Short and sweet.".into()));

    let requests = client.requests().await;
    assert_eq!(requests.len(), 1);
    let (messages, params) = &requests[0];
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, Role::User);
    assert!(messages[0].1.contains("time management"));
    assert!(messages[0].1.contains("Claude: Start with the hardest task."));
    assert_eq!(
        params.as_ref(),
        Some(&GenerationParams {
            max_tokens: Some(120),
            temperature: Some(0.7),
        })
    );
}

#[tokio::test]
async fn claude_requests_carry_no_temperature() {
    let claude = ProviderParticipant::claude(None, &config());
    assert_eq!(claude.generation_params().temperature, None);
    assert_eq!(claude.generation_params().max_tokens, Some(120));
}

#[tokio::test]
async fn missing_client_answers_with_a_placeholder() {
    let claude = ProviderParticipant::claude(None, &config());
    assert!(!claude.is_available());

    let outcome = claude.respond("creativity", &[]).await;

    assert_eq!(outcome.kind(), OutcomeKind::Unavailable);
    let text = outcome.content().unwrap();
    assert!(text.starts_with("🔥 Claude"));
    assert!(text.chars().count() <= 200);
}

#[tokio::test]
async fn empty_reply_degrades() {
    let client = make_client(vec![Ok("   ")]);
    let gemini = ProviderParticipant::gemini(Some(dyn_client(&client)), &config());

    let outcome = gemini.respond("morning routine", &[]).await;

    assert_eq!(outcome.kind(), OutcomeKind::Degraded);
    assert!(outcome.content().unwrap().contains("morning routine"));
}

#[tokio::test]
async fn transient_errors_degrade_and_quota_errors_are_fatal() {
    let cases = vec![
        (Speaker::Claude, api(529, "Overloaded"), OutcomeKind::Degraded),
        (Speaker::Claude, api(429, "rate_limit_error"), OutcomeKind::Fatal),
        (
            Speaker::Claude,
            api(400, "Your credit balance is too low"),
            OutcomeKind::Fatal,
        ),
        (
            Speaker::Gemini,
            api(429, "Resource has been exhausted (e.g. check quota)."),
            OutcomeKind::Fatal,
        ),
        (
            Speaker::Gemini,
            ClientError::Transport("connection reset".into()),
            OutcomeKind::Degraded,
        ),
        (
            Speaker::Gpt,
            api(429, "You exceeded your current quota"),
            OutcomeKind::Fatal,
        ),
        (
            Speaker::Gpt,
            ClientError::InvalidResponse("missing choices".into()),
            OutcomeKind::Degraded,
        ),
    ];

    for (speaker, error, expected) in cases {
        let client = make_client(vec![Err(error.clone())]);
        let participant = ProviderParticipant::new(speaker, Some(dyn_client(&client)), &config());
        let outcome = participant.respond("code review", &[]).await;
        assert_eq!(outcome.kind(), expected, "{} / {}", speaker, error);
        if let Some(text) = outcome.content() {
            assert!(text.chars().count() <= 200);
        }
    }
}

#[tokio::test]
async fn provider_fatal_halts_a_real_roster() {
    let claude = make_client(vec![Ok("Plan it."), Ok("Still planning.")]);
    let gemini = make_client(vec![Ok("Measure it."), Err(api(429, "quota exceeded"))]);
    let gpt = make_client(vec![Ok("Do both.")]);

    let cfg = config();
    let roster = Roster::new(
        Box::new(ProviderParticipant::claude(Some(dyn_client(&claude)), &cfg)),
        Box::new(ProviderParticipant::gemini(Some(dyn_client(&gemini)), &cfg)),
        Box::new(ProviderParticipant::gpt(Some(dyn_client(&gpt)), &cfg)),
    );
    let orchestrator = RoundOrchestrator::new(roster, cfg);
    let mut session = Session::new("time management").unwrap();

    orchestrator.start(&mut session).await.unwrap();
    let report = orchestrator.advance(&mut session).await.unwrap();

    assert_eq!(
        report.outcome,
        RoundOutcome::Halted {
            speaker: Speaker::Gemini
        }
    );
    assert_eq!(session.state(), RoundState::Halted);
    assert_eq!(session.transcript().len(), 4);
    assert_eq!(gpt.requests().await.len(), 1);
}

#[tokio::test]
async fn roster_without_keys_still_completes_rounds() {
    let credentials = Credentials::from_lookup(|_| None);
    let roster = Roster::from_credentials(&credentials, &config());
    assert!(roster.availability().iter().all(|(_, available)| !available));

    let orchestrator = RoundOrchestrator::new(roster, config());
    let mut session = Session::new("simple vs feature-rich").unwrap();
    let report = orchestrator.start(&mut session).await.unwrap();

    assert_eq!(report.outcome, RoundOutcome::Completed);
    assert_eq!(report.turns.len(), 3);
    for (turn, speaker) in report.turns.iter().zip(Speaker::ORDER) {
        assert_eq!(turn.speaker(), speaker);
        assert!(turn.content().starts_with(speaker.icon()));
    }
}

#[tokio::test]
async fn char_limit_above_the_hard_cap_is_ignored() {
    let long = "b".repeat(400);
    let client = make_client(vec![Ok(long.as_str())]);
    let loose = TrialogueConfig {
        char_limit: 1_000,
        ..config()
    };
    let gpt = ProviderParticipant::gpt(Some(dyn_client(&client)), &loose);

    let outcome = gpt.respond("remote work", &[]).await;

    let text = outcome.content().unwrap();
    assert_eq!(text.chars().count(), 200);
    assert!(text.ends_with("..."));
}
