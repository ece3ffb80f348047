use dashmap::DashSet;
use std::sync::Arc;

/// Allows one outstanding generation per session.
#[derive(Clone, Default)]
pub struct InFlightGate {
    active: Arc<DashSet<String>>,
}

/// Held while a generation runs; releases the session's slot on drop.
pub struct InFlightGuard {
    active: Arc<DashSet<String>>,
    key: String,
}

impl InFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `key`, or `None` if a request is already outstanding.
    pub fn try_acquire(&self, key: &str) -> Option<InFlightGuard> {
        if self.active.insert(key.to_string()) {
            Some(InFlightGuard {
                active: self.active.clone(),
                key: key.to_string(),
            })
        } else {
            None
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.contains(key)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}
