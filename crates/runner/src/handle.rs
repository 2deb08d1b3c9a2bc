//! Shared, lock-protected access to one session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tetris_duo_core::{Session, SessionSnapshot};
use tetris_duo_types::Command;

/// Cloneable handle to a session shared between the runner, input and
/// rendering threads. Every operation holds the lock for its whole duration,
/// so readers never observe a half-applied command or tick.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    // A panic while holding the lock leaves the session in a consistent
    // state between operations, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply(&self, cmd: Command) -> bool {
        self.lock().apply(cmd)
    }

    pub fn tick(&self, elapsed: Duration) -> bool {
        self.lock().tick(elapsed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    pub fn serialize_board(&self) -> String {
        self.lock().serialize_board()
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<Session> for SessionHandle {
    fn from(session: Session) -> Self {
        Self::new(session)
    }
}
