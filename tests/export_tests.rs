use async_trait::async_trait;
use std::time::Duration;
use trialogue::config::TrialogueConfig;
use trialogue::context_window::ContextMessage;
use trialogue::export::{export, ExportDocument};
use trialogue::orchestrator::{RoundOrchestrator, Roster};
use trialogue::participant::{Participant, ResponseOutcome};
use trialogue::session::Session;
use trialogue::transcript::Speaker;

struct Canned {
    speaker: Speaker,
    reply: &'static str,
}

#[async_trait]
impl Participant for Canned {
    fn speaker(&self) -> Speaker {
        self.speaker
    }

    async fn respond(&self, _topic: &str, _context: &[ContextMessage]) -> ResponseOutcome {
        match self.reply {
            "" => ResponseOutcome::Fatal,
            reply => ResponseOutcome::Success(reply.to_string()),
        }
    }
}

fn orchestrator(replies: [&'static str; 3]) -> RoundOrchestrator {
    let [claude, gemini, gpt] = replies;
    let roster = Roster::new(
        Box::new(Canned {
            speaker: Speaker::Claude,
            reply: claude,
        }),
        Box::new(Canned {
            speaker: Speaker::Gemini,
            reply: gemini,
        }),
        Box::new(Canned {
            speaker: Speaker::Gpt,
            reply: gpt,
        }),
    );
    RoundOrchestrator::new(
        roster,
        TrialogueConfig::default().with_turn_delay(Duration::ZERO),
    )
}

#[tokio::test]
async fn export_counts_rounds_and_messages() {
    let orchestrator = orchestrator(["計画を立てる", "データで測る", "両方を組み合わせる"]);
    let mut session = Session::new("時間管理").unwrap();

    orchestrator.start(&mut session).await.unwrap();
    orchestrator.advance(&mut session).await.unwrap();

    let document = export(&session).unwrap();
    assert_eq!(document.session_id, session.id());
    assert_eq!(document.topic, "時間管理");
    assert_eq!(document.total_rounds, 2);
    assert_eq!(document.total_messages, 6);
    assert_eq!(document.messages.len(), 6);
    assert_eq!(document.messages[3].round(), 2);
    assert_eq!(document.messages[3].speaker(), Speaker::Claude);
}

#[tokio::test]
async fn json_keeps_unicode_and_field_names() {
    let orchestrator = orchestrator(["計画を立てる", "データで測る", "両方を組み合わせる"]);
    let mut session = Session::new("時間管理").unwrap();
    orchestrator.start(&mut session).await.unwrap();

    let json = export(&session).unwrap().to_json().unwrap();

    assert!(json.contains("時間管理"));
    assert!(json.contains("🔥"));
    assert!(!json.contains("\\u"));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "session_id",
        "topic",
        "total_rounds",
        "total_messages",
        "messages",
        "exported_at",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    let first = &value["messages"][0];
    assert_eq!(first["round"], 1);
    assert_eq!(first["speaker"], "Claude");
    assert_eq!(first["content"], "計画を立てる");
    assert_eq!(first["icon"], "🔥");
    assert!(first["timestamp"].is_string());

    let parsed = ExportDocument::from_json(&json).unwrap();
    assert_eq!(parsed.total_messages, 3);
    assert_eq!(parsed.messages[2].marker(), "⚙️");
}

#[tokio::test]
async fn halted_session_exports_what_was_said() {
    let orchestrator = orchestrator(["Plan it.", "", "unreachable"]);
    let mut session = Session::new("time management").unwrap();
    orchestrator.start(&mut session).await.unwrap();

    let document = export(&session).unwrap();
    assert_eq!(document.total_rounds, 1);
    assert_eq!(document.total_messages, 1);
}

#[tokio::test]
async fn reset_session_has_nothing_to_export() {
    let orchestrator = orchestrator(["a", "b", "c"]);
    let mut session = Session::new("creativity").unwrap();
    orchestrator.start(&mut session).await.unwrap();
    assert!(export(&session).is_some());

    session.reset();
    assert!(export(&session).is_none());
}

#[tokio::test]
async fn repeated_exports_differ_only_in_timestamp() {
    let orchestrator = orchestrator(["Plan it.", "Measure it.", "Do both."]);
    let mut session = Session::new("time management").unwrap();
    orchestrator.start(&mut session).await.unwrap();
    let before = session.transcript().clone();

    let first = export(&session).unwrap();
    let second = export(&session).unwrap();

    assert_eq!(first.session_id, second.session_id);
    assert_eq!(first.topic, second.topic);
    assert_eq!(first.total_rounds, second.total_rounds);
    assert_eq!(first.total_messages, second.total_messages);
    assert_eq!(first.messages, second.messages);
    assert!(second.exported_at >= first.exported_at);

    let aligned = ExportDocument {
        exported_at: first.exported_at,
        ..second
    };
    assert_eq!(aligned, first);
    assert_eq!(session.transcript(), &before);
}
