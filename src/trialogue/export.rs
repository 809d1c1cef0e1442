//! JSON export of a session transcript.
//!
//! The exported document looks like:
//!
//! ```json
//! {
//!   "session_id": "a1b2c3d4",
//!   "topic": "time management",
//!   "total_rounds": 2,
//!   "total_messages": 6,
//!   "messages": [
//!     { "round": 1, "speaker": "Claude", "content": "...", "timestamp": "...", "icon": "🔥" }
//!   ],
//!   "exported_at": "2026-01-01T12:00:00Z"
//! }
//! ```
//!
//! Non-ASCII text (icons, CJK content) is written as-is, never escaped.

use crate::trialogue::session::Session;
use crate::trialogue::transcript::Turn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub session_id: String,
    pub topic: String,
    pub total_rounds: u32,
    pub total_messages: usize,
    pub messages: Vec<Turn>,
    pub exported_at: DateTime<Utc>,
}

/// Snapshot `session` for export, or `None` when nothing has been said yet.
///
/// Works in every session state, including after a halt or stop.
pub fn export(session: &Session) -> Option<ExportDocument> {
    let transcript = session.transcript();
    if transcript.is_empty() {
        return None;
    }
    Some(ExportDocument {
        session_id: session.id().to_string(),
        topic: session.topic().to_string(),
        total_rounds: session.current_round(),
        total_messages: transcript.len(),
        messages: transcript.turns().to_vec(),
        exported_at: Utc::now(),
    })
}

impl ExportDocument {
    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Download name for an export taken at `at`, e.g. `ai_conversation_20260101_1200.json`.
pub fn suggested_filename(at: &DateTime<Utc>) -> String {
    format!("ai_conversation_{}.json", at.format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_session_has_nothing_to_export() {
        let session = Session::new("remote work").unwrap();
        assert!(export(&session).is_none());
    }

    #[test]
    fn filename_uses_minute_precision() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 42).unwrap();
        assert_eq!(suggested_filename(&at), "ai_conversation_20260307_0905.json");
    }
}
