//! Per-identity mutual exclusion
//!
//! A reconciliation cycle for one resource must not overlap another cycle for
//! the same resource. [`IdentityLocks`] hands out one [`IdentityGuard`] per
//! `(type, identity)` key; the key is released when the guard drops.

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

type Key = (String, String);

/// Table of resources with a cycle in progress
#[derive(Debug, Default)]
pub struct IdentityLocks {
    held: Mutex<HashSet<Key>>,
    released: Condvar,
}

impl IdentityLocks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock_held(&self) -> MutexGuard<'_, HashSet<Key>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the token for `(type_name, identity)`, waiting up to `wait`
    ///
    /// Returns `None` if another holder did not release it in time. A wait
    /// too long to represent as a deadline never times out.
    pub fn acquire(
        self: &Arc<Self>,
        type_name: &str,
        identity: &str,
        wait: Duration,
    ) -> Option<IdentityGuard> {
        let key = (type_name.to_string(), identity.to_string());
        let held = self.wait_while(wait, |held| held.contains(&key), || {
            log::debug!("Waiting for running cycle of {type_name} {identity}");
        });
        let mut held = held?;

        held.insert(key.clone());
        Some(IdentityGuard {
            locks: Arc::clone(self),
            key,
        })
    }

    /// Wait until no token is held, for at most `wait`
    ///
    /// Returns `false` if some provider call was still running at the deadline.
    pub fn wait_idle(&self, wait: Duration) -> bool {
        self.wait_while(wait, |held| !held.is_empty(), || {
            log::debug!("Waiting for running provider calls to finish");
        })
        .is_some()
    }

    fn wait_while(
        &self,
        wait: Duration,
        busy: impl Fn(&HashSet<Key>) -> bool,
        on_wait: impl Fn(),
    ) -> Option<MutexGuard<'_, HashSet<Key>>> {
        let deadline = Instant::now().checked_add(wait);
        let mut held = self.lock_held();

        while busy(&*held) {
            on_wait();
            held = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    self.released
                        .wait_timeout(held, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .released
                    .wait(held)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }

        Some(held)
    }

    /// Whether a cycle currently holds `(type_name, identity)`
    pub fn is_held(&self, type_name: &str, identity: &str) -> bool {
        self.lock_held()
            .contains(&(type_name.to_string(), identity.to_string()))
    }
}

/// Token proving exclusive access to one resource
#[derive(Debug)]
pub struct IdentityGuard {
    locks: Arc<IdentityLocks>,
    key: Key,
}

impl Drop for IdentityGuard {
    fn drop(&mut self) {
        self.locks.lock_held().remove(&self.key);
        self.locks.released.notify_all();
    }
}
