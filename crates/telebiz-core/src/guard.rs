//! At-most-one-in-flight guard for user actions.
//!
//! A create or update action is identified by a logical key. While a ticket
//! for a key is alive, further attempts with the same key are rejected
//! instead of issuing a duplicate external call.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::GuardError;

/// Tracks which action keys currently have a request outstanding.
#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`, failing if it is already claimed.
    pub fn acquire(&self, key: impl Into<String>) -> Result<InFlightTicket, GuardError> {
        let key = key.into();
        let mut keys = self
            .keys
            .lock()
            .map_err(|e| GuardError::LockPoisoned(e.to_string()))?;

        if !keys.insert(key.clone()) {
            debug!("Rejecting duplicate in-flight action: {}", key);
            return Err(GuardError::AlreadyInFlight(key));
        }

        Ok(InFlightTicket {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    /// Whether `key` is currently claimed.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.keys
            .lock()
            .map(|keys| keys.contains(key))
            .unwrap_or(false)
    }

    /// Number of claimed keys.
    pub fn len(&self) -> usize {
        self.keys.lock().map(|keys| keys.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct InFlightTicket {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlightTicket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.remove(&self.key);
        }
    }
}
