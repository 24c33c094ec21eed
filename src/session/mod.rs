//! Per-sender sessions
//!
//! A session collects two documents, asks for confirmation and either
//! composes them or discards them. Nothing is persisted.

mod manager;
mod store;
mod types;

pub use manager::SessionManager;
pub use store::{InMemorySessionStore, SessionSlot, SessionStore, SlotEntry};
pub use types::{
    ConfirmOutcome, RejectReason, Reply, ReplyOutcome, Session, SessionError, SessionKey,
    SessionSnapshot, SessionState, StagedDocument, SubmitOutcome, MAX_STAGED_DOCUMENTS,
};
