// crates/colloquy-core/src/runtime/store.rs
// ============================================================================
// Module: Colloquy In-Memory Session Store
// Description: Reference session store for tests and embedded hosts.
// Purpose: Provide a deterministic, lock-guarded SessionStore implementation.
// Dependencies: crate::{core, interfaces}, std
// ============================================================================

//! ## Overview
//! `InMemorySessionStore` keeps full session snapshots in a mutex-guarded
//! map. It is the reference store for tests and single-process hosts;
//! durable stores live behind the same [`SessionStore`] interface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::core::identifiers::SessionId;
use crate::core::state::SessionState;
use crate::interfaces::SessionStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    /// Session snapshots keyed by session id.
    sessions: Mutex<BTreeMap<SessionId, SessionState>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_poisoned| StoreError::Store("session store lock poisoned".to_string()))?;
        Ok(sessions.get(session_id).cloned())
    }

    fn save(&self, session_id: &SessionId, state: &SessionState) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_poisoned| StoreError::Store("session store lock poisoned".to_string()))?;
        sessions.insert(session_id.clone(), state.clone());
        Ok(())
    }
}
