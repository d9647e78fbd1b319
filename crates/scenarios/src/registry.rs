use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::SessionStore;
use crate::{Result, ScenarioError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Per-session stores behind one lock. Sessions never see each other's state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionStore>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> SessionId {
        let id = SessionId::new();
        self.lock().insert(id, SessionStore::new());
        tracing::debug!(session = %id, "session opened");
        id
    }

    pub fn close(&self, id: &SessionId) -> Option<SessionStore> {
        self.lock().remove(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` against the session's store while holding the registry lock.
    pub fn with_session<R>(&self, id: &SessionId, f: impl FnOnce(&mut SessionStore) -> R) -> Result<R> {
        let mut sessions = self.lock();
        let store = sessions
            .get_mut(id)
            .ok_or(ScenarioError::UnknownSession(*id))?;
        Ok(f(store))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionStore>> {
        // A panic inside `with_session` leaves the map itself consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
