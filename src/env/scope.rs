//! Scoped switch/restore window around client construction.

use std::sync::{Mutex, MutexGuard, PoisonError};
#[cfg(test)]
use std::sync::TryLockError;

use super::Environment;
use crate::secrets::{Credential, CredentialSnapshot, SecretStore};

/// Serializes every switch/restore window in the process.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Takes the process-wide environment lock.
///
/// Anything that writes credentials outside an [`EnvScope`] holds this while
/// it does so.
pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether some thread currently holds the environment lock.
#[cfg(test)]
pub(crate) fn env_locked() -> bool {
    matches!(ENV_LOCK.try_lock(), Err(TryLockError::WouldBlock))
}

/// A switch/restore window over a [`SecretStore`] and its environment.
///
/// Entering takes a process-wide lock and records the current snapshot.
/// Overrides applied with [`EnvScope::switch`] are visible until the scope
/// is dropped; dropping rolls the snapshot back to the recorded state and
/// restores the environment from it, whether construction succeeded or not.
///
/// Scopes don't nest: entering a second scope on the same thread deadlocks.
pub struct EnvScope<'a> {
    store: &'a mut SecretStore,
    env: &'a mut dyn Environment,
    checkpoint: CredentialSnapshot,
    _lock: MutexGuard<'static, ()>,
}

impl<'a> EnvScope<'a> {
    pub fn enter(store: &'a mut SecretStore, env: &'a mut dyn Environment) -> Self {
        let lock = lock_env();
        let checkpoint = store.snapshot().clone();
        Self {
            store,
            env,
            checkpoint,
            _lock: lock,
        }
    }

    /// The store's snapshot, including overrides applied in this scope.
    pub fn snapshot(&self) -> &CredentialSnapshot {
        self.store.snapshot()
    }

    /// Applies overrides to the environment and the snapshot.
    pub fn switch(&mut self, overrides: &[(Credential, Option<String>)]) {
        self.store.switch(&mut *self.env, overrides);
    }

    /// Reads the credential's variable from the environment as it is now.
    pub fn var(&self, credential: Credential) -> Option<String> {
        self.env.var(credential.env_name())
    }
}

impl Drop for EnvScope<'_> {
    fn drop(&mut self) {
        self.store
            .reset_snapshot(std::mem::take(&mut self.checkpoint));
        self.store.restore(&mut *self.env);
    }
}
