//! Session state machine
//!
//! ```text
//!  (absent) ──add_file──► Collecting ──add_file──► AwaitingConfirm
//!                          (1 staged)               (2 staged)
//!                                                     │
//!                         confirm(false) ◄────────────┤
//!                           (removed)                 │ confirm(true)
//!                                                     ▼
//!                                       compose ok ──► (removed)
//!                                       compose err ─► AwaitingConfirm
//! ```

use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use crate::artifact::ArtifactStore;
use crate::compose::ComposePipeline;
use crate::delivery::Delivery;
use crate::document::{DocumentError, DocumentSource, SourceDocument};
use crate::render::{RenderPool, PAGES_PER_DOCUMENT};

use super::store::{InMemorySessionStore, SessionSlot, SessionStore, SlotEntry};
use super::types::{
    ConfirmOutcome, RejectReason, Reply, ReplyOutcome, Session, SessionError, SessionKey,
    SessionSnapshot, SessionState, SubmitOutcome,
};

/// Drives per-sender sessions
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    store: Arc<dyn SessionStore>,
    source: Arc<dyn DocumentSource>,
    pipeline: ComposePipeline,
    /// Inbound checks; separate from the pipeline's pool so uploads never
    /// queue behind rendering
    validator: RenderPool,
    artifacts: Arc<dyn ArtifactStore>,
    delivery: Arc<dyn Delivery>,
}

impl SessionManager {
    /// Create a manager with an in-memory session store
    pub fn new(
        pipeline: ComposePipeline,
        source: Arc<dyn DocumentSource>,
        artifacts: Arc<dyn ArtifactStore>,
        delivery: Arc<dyn Delivery>,
    ) -> Self {
        Self::with_store(
            Arc::new(InMemorySessionStore::new()),
            pipeline,
            source,
            artifacts,
            delivery,
        )
    }

    pub fn with_store(
        store: Arc<dyn SessionStore>,
        pipeline: ComposePipeline,
        source: Arc<dyn DocumentSource>,
        artifacts: Arc<dyn ArtifactStore>,
        delivery: Arc<dyn Delivery>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionManagerInner {
                store,
                source,
                pipeline,
                validator: RenderPool::default(),
                artifacts,
                delivery,
            }),
        }
    }

    pub fn pipeline(&self) -> &ComposePipeline {
        &self.inner.pipeline
    }

    pub fn artifacts(&self) -> &Arc<dyn ArtifactStore> {
        &self.inner.artifacts
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Validate and stage an inbound document.
    ///
    /// Invalid or short documents are rejected before the session is
    /// touched. A document arriving while the session awaits confirmation
    /// is not staged (`accepted == false`).
    pub async fn add_file(
        &self,
        key: &SessionKey,
        bytes: Vec<u8>,
    ) -> Result<SubmitOutcome, SessionError> {
        let document = match self.open(bytes).await {
            Ok(document) => document,
            Err(e) => {
                tracing::info!(session_key = %key, error = %e, "Rejected inbound document");
                return Err(e.into());
            }
        };

        let (_slot, mut entry) = self.lock_or_create(key).await;
        let session = entry
            .session
            .get_or_insert_with(|| Session::new(key.clone()));

        let document_id = document.id();
        let accepted = session.stage(document);
        let outcome = SubmitOutcome {
            accepted,
            staged_count: session.staged_count(),
            state: session.state,
        };

        if accepted {
            tracing::info!(
                session_key = %key,
                document_id = %document_id,
                staged = outcome.staged_count,
                state = ?outcome.state,
                "Staged document"
            );
        } else {
            tracing::info!(
                session_key = %key,
                staged = outcome.staged_count,
                "Session already awaiting confirmation, document ignored"
            );
        }

        Ok(outcome)
    }

    /// Answer the pending confirmation for `key`.
    ///
    /// A composition or storage failure leaves the session in
    /// AwaitingConfirm so the sender can confirm again.
    pub async fn confirm(
        &self,
        key: &SessionKey,
        affirmative: bool,
    ) -> Result<ConfirmOutcome, SessionError> {
        let Some((slot, mut entry)) = self.lock_existing(key).await else {
            return Ok(rejected(RejectReason::NoSession, 0));
        };

        let (first, second) = match entry.session.as_ref() {
            None => {
                // Slot left behind by an abandoned submit
                self.inner.store.retire(key, &slot, &mut entry);
                return Ok(rejected(RejectReason::NoSession, 0));
            }
            Some(session) => match (session.state, session.documents.as_slice()) {
                (SessionState::AwaitingConfirm, [first, second]) => (first.clone(), second.clone()),
                _ => {
                    return Ok(rejected(RejectReason::NotReady, session.staged_count()));
                }
            },
        };

        if !affirmative {
            self.inner.store.retire(key, &slot, &mut entry);
            tracing::info!(session_key = %key, "Session cancelled");
            return Ok(ConfirmOutcome::Cancelled);
        }

        let composite = match self.inner.pipeline.run(&first, &second).await {
            Ok(composite) => composite,
            Err(e) => {
                tracing::warn!(
                    session_key = %key,
                    error = %e,
                    "Composition failed, session kept for retry"
                );
                return Err(e.into());
            }
        };

        let result = match self.inner.artifacts.put(composite.bytes).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(session_key = %key, error = %e, "Failed to store composite");
                return Err(e.into());
            }
        };

        self.inner.store.retire(key, &slot, &mut entry);
        drop(entry);

        tracing::info!(
            session_key = %key,
            artifact_id = %result.id,
            size = result.size(),
            "Session completed"
        );

        if let Err(e) = self.inner.delivery.send(&result, key.as_str()).await {
            tracing::warn!(session_key = %key, artifact_id = %result.id, error = %e, "Delivery failed");
        }

        Ok(ConfirmOutcome::Composed(result))
    }

    /// Interpret a free-text yes/no reply
    pub async fn reply(&self, key: &SessionKey, text: &str) -> Result<ReplyOutcome, SessionError> {
        match Reply::parse(text) {
            Some(reply) => Ok(ReplyOutcome::Confirm(
                self.confirm(key, reply.is_affirmative()).await?,
            )),
            None => {
                tracing::debug!(session_key = %key, "Unrecognized reply");
                Ok(ReplyOutcome::Unrecognized)
            }
        }
    }

    /// Current state of `key`'s session, if any
    pub async fn snapshot(&self, key: &SessionKey) -> Option<SessionSnapshot> {
        let (slot, mut entry) = self.lock_existing(key).await?;
        match entry.session.as_ref() {
            Some(session) => Some(session.snapshot()),
            None => {
                // Slot left behind by an abandoned submit
                self.inner.store.retire(key, &slot, &mut entry);
                None
            }
        }
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.inner.store.len()
    }

    /// Stop accepting render and validation work
    pub fn close(&self) {
        self.inner.validator.close();
        self.inner.pipeline.pool().close();
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Parse and page-check on the validation pool, outside any session lock
    async fn open(&self, bytes: Vec<u8>) -> Result<SourceDocument, DocumentError> {
        let source = Arc::clone(&self.inner.source);
        self.inner
            .validator
            .run(move || {
                let document = source.open(bytes)?;
                document.ensure_pages(PAGES_PER_DOCUMENT)?;
                Ok::<_, DocumentError>(document)
            })
            .await?
    }

    async fn lock_or_create(&self, key: &SessionKey) -> (SessionSlot, OwnedMutexGuard<SlotEntry>) {
        loop {
            let slot = self.inner.store.slot(key);
            let entry = Arc::clone(&slot).lock_owned().await;
            if !entry.is_retired() {
                return (slot, entry);
            }
        }
    }

    async fn lock_existing(
        &self,
        key: &SessionKey,
    ) -> Option<(SessionSlot, OwnedMutexGuard<SlotEntry>)> {
        loop {
            let slot = self.inner.store.existing(key)?;
            let entry = Arc::clone(&slot).lock_owned().await;
            if !entry.is_retired() {
                return Some((slot, entry));
            }
        }
    }
}

fn rejected(reason: RejectReason, staged_count: usize) -> ConfirmOutcome {
    ConfirmOutcome::Rejected {
        reason,
        staged_count,
    }
}
