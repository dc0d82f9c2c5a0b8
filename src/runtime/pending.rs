//! In-flight mutation keys (`loadingActions`) with scoped release.

use std::{
    fmt,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard},
};

use hashbrown::HashSet;
use serde::Serialize;

/// What a pending mutation is holding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKey<Id> {
    /// A create is in flight.
    Create,
    /// An update or delete of this record is in flight.
    Record(Id),
}

impl<Id: fmt::Display> fmt::Display for ActionKey<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Record(id) => write!(f, "record {id}"),
        }
    }
}

/// Set of keys with an in-flight mutation.
#[derive(Debug)]
pub struct PendingActions<Id: Eq + Hash> {
    keys: Arc<Mutex<HashSet<ActionKey<Id>>>>,
}

impl<Id: Eq + Hash> Default for PendingActions<Id> {
    fn default() -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<Id: Clone + Eq + Hash> PendingActions<Id> {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes `key`, or `None` if it is already held.
    pub fn try_acquire(&self, key: ActionKey<Id>) -> Option<ActionLease<Id>> {
        let mut keys = lock(&self.keys);
        if !keys.insert(key.clone()) {
            return None;
        }
        Some(ActionLease {
            key,
            keys: Arc::clone(&self.keys),
        })
    }

    /// True while `key` is held.
    pub fn is_pending(&self, key: &ActionKey<Id>) -> bool {
        lock(&self.keys).contains(key)
    }

    /// True while any mutation is in flight.
    pub fn saving(&self) -> bool {
        !lock(&self.keys).is_empty()
    }

    /// Keys currently held, in no particular order.
    pub fn keys(&self) -> Vec<ActionKey<Id>> {
        lock(&self.keys).iter().cloned().collect()
    }
}

/// Held for the duration of one mutation; dropping it releases the key on
/// every exit path, including task abort.
#[derive(Debug)]
pub struct ActionLease<Id: Eq + Hash> {
    key: ActionKey<Id>,
    keys: Arc<Mutex<HashSet<ActionKey<Id>>>>,
}

impl<Id: Eq + Hash> ActionLease<Id> {
    /// Key this lease holds.
    pub fn key(&self) -> &ActionKey<Id> {
        &self.key
    }
}

impl<Id: Eq + Hash> Drop for ActionLease<Id> {
    fn drop(&mut self) {
        lock(&self.keys).remove(&self.key);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
