//! Session storage
//!
//! Every key maps to its own slot behind an async mutex. Operations for one
//! sender serialize on that slot; different senders never share a lock. The
//! key map itself is only locked for lookup.
//!
//! A terminal transition retires the slot while its lock is held: the
//! session is cleared, the slot is flagged, and the map entry is removed.
//! A caller that was already queued on the retired slot sees the flag and
//! resolves the key again.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::{Session, SessionKey};

/// Shared handle to one key's slot
pub type SessionSlot = Arc<tokio::sync::Mutex<SlotEntry>>;

/// Contents of a slot
#[derive(Debug, Default)]
pub struct SlotEntry {
    pub session: Option<Session>,
    retired: bool,
}

impl SlotEntry {
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    fn retire(&mut self) {
        self.session = None;
        self.retired = true;
    }
}

/// Key → slot storage
pub trait SessionStore: Send + Sync {
    /// Slot for `key`, created if absent
    fn slot(&self, key: &SessionKey) -> SessionSlot;

    /// Slot for `key` if one exists
    fn existing(&self, key: &SessionKey) -> Option<SessionSlot>;

    /// Retire `slot`. The caller must hold the slot's lock (`entry`).
    fn retire(&self, key: &SessionKey, slot: &SessionSlot, entry: &mut SlotEntry);

    /// Number of live slots: those holding a session or busy with an
    /// operation. Empty idle slots do not count.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slots: Mutex<HashMap<SessionKey, SessionSlot>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn slot(&self, key: &SessionKey) -> SessionSlot {
        let mut slots = self.slots.lock();
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn existing(&self, key: &SessionKey) -> Option<SessionSlot> {
        self.slots.lock().get(key).cloned()
    }

    fn retire(&self, key: &SessionKey, slot: &SessionSlot, entry: &mut SlotEntry) {
        entry.retire();

        let mut slots = self.slots.lock();
        // A newer slot for the same key must survive
        if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(key);
        }
    }

    fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.try_lock().map_or(true, |entry| entry.session.is_some()))
            .count()
    }
}
