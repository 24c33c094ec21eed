//! Session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{ArtifactError, CompositeResult};
use crate::compose::ComposeError;
use crate::document::{DocumentError, SourceDocument};

/// Documents a session collects before asking for confirmation
pub const MAX_STAGED_DOCUMENTS: usize = 2;

/// Sender identifier that owns a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Fewer than two documents staged
    Collecting,
    /// Two documents staged, waiting for yes/no
    AwaitingConfirm,
}

/// Per-sender conversation state
#[derive(Debug, Clone)]
pub struct Session {
    pub key: SessionKey,
    pub state: SessionState,
    /// Staged documents in arrival order
    pub documents: Vec<SourceDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        let now = Utc::now();
        Self {
            key,
            state: SessionState::Collecting,
            documents: Vec::with_capacity(MAX_STAGED_DOCUMENTS),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn staged_count(&self) -> usize {
        self.documents.len()
    }

    /// Stage a document; returns `false` if the session is already full
    pub fn stage(&mut self, document: SourceDocument) -> bool {
        if self.state == SessionState::AwaitingConfirm
            || self.documents.len() >= MAX_STAGED_DOCUMENTS
        {
            return false;
        }

        self.documents.push(document);
        if self.documents.len() == MAX_STAGED_DOCUMENTS {
            self.state = SessionState::AwaitingConfirm;
        }
        self.updated_at = Utc::now();
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            key: self.key.clone(),
            state: self.state,
            staged_count: self.staged_count(),
            documents: self
                .documents
                .iter()
                .map(|d| StagedDocument {
                    id: d.id().to_string(),
                    size: d.size(),
                    page_count: d.page_count(),
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Result of submitting a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub accepted: bool,
    pub staged_count: usize,
    pub state: SessionState,
}

/// Why a confirm did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The sender has no session
    NoSession,
    /// The session is still collecting documents
    NotReady,
}

/// Result of a confirm call
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// Composite stored; the session is gone
    Composed(CompositeResult),
    /// Staged documents discarded; the session is gone
    Cancelled,
    /// Nothing happened
    Rejected {
        reason: RejectReason,
        staged_count: usize,
    },
}

/// A parsed yes/no reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    No,
}

impl Reply {
    /// Parse `yes`/`y`/`no`/`n`, ignoring case and surrounding whitespace
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Some(Reply::Yes),
            "no" | "n" => Some(Reply::No),
            _ => None,
        }
    }

    pub fn is_affirmative(self) -> bool {
        self == Reply::Yes
    }
}

/// Result of a free-text reply
#[derive(Debug, Clone)]
pub enum ReplyOutcome {
    Confirm(ConfirmOutcome),
    Unrecognized,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedDocument {
    pub id: String,
    pub size: usize,
    pub page_count: usize,
}

/// Read-only view of a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub key: SessionKey,
    pub state: SessionState,
    pub staged_count: usize,
    pub documents: Vec<StagedDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session operation failures
#[derive(Debug, Error)]
pub enum SessionError {
    /// Inbound document rejected; session untouched
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Composition failed; session stays in AwaitingConfirm
    #[error("Composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Artifact storage failed: {0}")]
    Artifact(#[from] ArtifactError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_parse() {
        assert_eq!(Reply::parse("yes"), Some(Reply::Yes));
        assert_eq!(Reply::parse("  Y \n"), Some(Reply::Yes));
        assert_eq!(Reply::parse("NO"), Some(Reply::No));
        assert_eq!(Reply::parse("n"), Some(Reply::No));
        assert_eq!(Reply::parse("yep"), None);
        assert_eq!(Reply::parse(""), None);
    }

    #[test]
    fn test_stage_transitions_at_two() {
        let mut session = Session::new("alice".into());
        assert_eq!(session.state, SessionState::Collecting);

        assert!(session.stage(SourceDocument::new(vec![1], 2)));
        assert_eq!(session.state, SessionState::Collecting);

        assert!(session.stage(SourceDocument::new(vec![2], 2)));
        assert_eq!(session.state, SessionState::AwaitingConfirm);

        assert!(!session.stage(SourceDocument::new(vec![3], 2)));
        assert_eq!(session.staged_count(), 2);
        assert_eq!(session.documents[0].bytes(), &[1]);
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&SessionState::AwaitingConfirm).unwrap();
        assert_eq!(json, "\"awaiting_confirm\"");

        let outcome = SubmitOutcome {
            accepted: true,
            staged_count: 1,
            state: SessionState::Collecting,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["stagedCount"], 1);
        assert_eq!(value["state"], "collecting");
    }
}
