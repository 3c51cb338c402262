use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::memory::ReminderKey;

/// Tracks the cancellation handle of every armed reminder trigger.
///
/// At most one token is registered per reminder key.
#[derive(Debug, Default)]
pub struct CancellationRegistry {
    armed: HashMap<ReminderKey, CancellationToken>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh token for `key`, or `None` if one is already armed.
    pub fn arm(&mut self, key: ReminderKey) -> Option<CancellationToken> {
        if self.armed.contains_key(&key) {
            return None;
        }
        let token = CancellationToken::new();
        self.armed.insert(key, token.clone());
        Some(token)
    }

    /// Forgets the token after its trigger fired.
    pub fn disarm(&mut self, key: &ReminderKey) {
        self.armed.remove(key);
    }

    /// Cancels and forgets the token. Returns whether a trigger was armed.
    pub fn cancel(&mut self, key: &ReminderKey) -> bool {
        match self.armed.remove(key) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.armed.drain() {
            token.cancel();
        }
    }

    pub fn is_armed(&self, key: &ReminderKey) -> bool {
        self.armed.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}
