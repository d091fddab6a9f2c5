//! Conversation sessions.
//!
//! One session per user id, held in a concurrent map for the lifetime of
//! the process. Soft state: never persisted, lost on restart. The store is
//! injected into the engine rather than reached as a global, and writes go
//! through compare-and-swap so a rare double submission by the same user
//! cannot silently drop an update.

use dashmap::DashMap;

use crate::types::{PendingConfirmation, PriceVariant};

/// Per-user conversation state.
///
/// Invariant: at most one of {`pending` set, `variants` non-empty} at a
/// time, so a short "yes"/"2" reply always has exactly one meaning. Use
/// the mutators, which clear the other side.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The medicine the conversation is currently about
    pub last_medicine: Option<String>,

    /// A name suggestion awaiting yes/no
    pub pending: Option<PendingConfirmation>,

    /// Price variants awaiting a numbered selection (full set, in service
    /// order; display shows the first few)
    pub variants: Vec<PriceVariant>,

    /// The variant the user last selected
    pub selected_variant: Option<PriceVariant>,

    /// Write revision used by compare-and-swap
    pub revision: u64,
}

impl Session {
    /// Enter the confirmation state, leaving variant selection.
    pub fn set_pending(&mut self, pending: PendingConfirmation) {
        self.pending = Some(pending);
        self.variants.clear();
    }

    /// Enter the variant-selection state, leaving confirmation.
    pub fn set_variants(&mut self, variants: Vec<PriceVariant>) {
        self.variants = variants;
        self.pending = None;
    }

    /// Return to the idle state.
    pub fn clear_transient(&mut self) {
        self.pending = None;
        self.variants.clear();
    }
}

/// Thread-safe keyed session store.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Current state for a user, created on first sight. Returns a clone;
    /// commit changes with [`SessionStore::compare_and_swap`].
    pub fn snapshot(&self, user_id: &str) -> Session {
        self.sessions
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    /// Commit a session if nobody else wrote since the snapshot was taken.
    ///
    /// On conflict the caller gets the current state back and decides
    /// whether to reprocess.
    pub fn compare_and_swap(
        &self,
        user_id: &str,
        expected_revision: u64,
        mut updated: Session,
    ) -> Result<(), Session> {
        let mut entry = self.sessions.entry(user_id.to_string()).or_default();

        if entry.revision != expected_revision {
            return Err(entry.clone());
        }

        updated.revision = expected_revision + 1;
        *entry = updated;
        Ok(())
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
