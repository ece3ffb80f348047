use super::ledger::{LedgerActor, LedgerConnector, LedgerError};
use crate::models::Identity;
use dashmap::DashMap;
use std::sync::Arc;

struct CachedHandle {
    actor: Arc<dyn LedgerActor>,
    subject: Option<String>,
    expires_at: Option<i64>,
    last_used: i64,
}

impl CachedHandle {
    fn serves(&self, identity: Option<&Identity>, now: i64) -> bool {
        let same_subject = self.subject.as_deref() == identity.map(|i| i.subject.as_str());
        same_subject && !self.is_expired_at(now)
    }

    fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Ledger actors cached per browser session.
///
/// An actor is built the first time a session needs the ledger and reused
/// until the session logs out, switches identity, or its identity expires.
/// Handles of sessions that went away without logging out are evicted once
/// their identity expires or they sit idle for `idle_timeout_secs`.
pub struct LedgerHandles {
    connector: Arc<dyn LedgerConnector>,
    handles: DashMap<String, CachedHandle>,
    idle_timeout_secs: i64,
}

impl LedgerHandles {
    pub fn new(connector: Arc<dyn LedgerConnector>, idle_timeout_secs: i64) -> Self {
        Self {
            connector,
            handles: DashMap::new(),
            idle_timeout_secs,
        }
    }

    /// Return the session's actor, constructing it on first use.
    pub fn acquire(
        &self,
        client_key: &str,
        identity: Option<&Identity>,
    ) -> Result<Arc<dyn LedgerActor>, LedgerError> {
        self.acquire_at(client_key, identity, chrono::Utc::now().timestamp())
    }

    fn acquire_at(
        &self,
        client_key: &str,
        identity: Option<&Identity>,
        now: i64,
    ) -> Result<Arc<dyn LedgerActor>, LedgerError> {
        if let Some(identity) = identity {
            if identity.is_expired_at(now) {
                self.invalidate(client_key);
                return Err(LedgerError::Unauthenticated);
            }
        }

        if let Some(mut cached) = self.handles.get_mut(client_key) {
            if cached.serves(identity, now) {
                cached.last_used = now;
                return Ok(cached.actor.clone());
            }
        }

        // The map only grows here, so sweeping before each insert keeps it
        // bounded by the sessions that are still alive.
        self.evict_stale_at(now);

        let actor = self.connector.connect(identity)?;
        tracing::info!(
            principal = actor.principal().unwrap_or("anonymous"),
            "Ledger handle created for session"
        );

        self.handles.insert(
            client_key.to_string(),
            CachedHandle {
                actor: actor.clone(),
                subject: identity.map(|i| i.subject.clone()),
                expires_at: identity.map(|i| i.expires_at),
                last_used: now,
            },
        );

        Ok(actor)
    }

    /// Drop handles whose identity expired or that sat idle too long.
    /// Returns how many were removed.
    pub fn evict_stale(&self) -> usize {
        self.evict_stale_at(chrono::Utc::now().timestamp())
    }

    fn evict_stale_at(&self, now: i64) -> usize {
        let before = self.handles.len();
        self.handles.retain(|_, handle| {
            !handle.is_expired_at(now) && now - handle.last_used < self.idle_timeout_secs
        });
        let evicted = before.saturating_sub(self.handles.len());
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted stale ledger handles");
        }
        evicted
    }

    /// Drop the session's actor. Returns whether one was cached.
    pub fn invalidate(&self, client_key: &str) -> bool {
        self.handles.remove(client_key).is_some()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ledger::{GeneratedRecord, NewDraft};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullActor(Option<String>);

    #[async_trait]
    impl LedgerActor for NullActor {
        fn principal(&self) -> Option<&str> {
            self.0.as_deref()
        }

        async fn create_draft(&self, _draft: &NewDraft<'_>) -> Result<String, LedgerError> {
            Ok("draft".into())
        }

        async fn save_generated(&self, _id: &str, _record: &GeneratedRecord) -> Result<(), LedgerError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingConnector {
        connects: AtomicUsize,
    }

    impl LedgerConnector for CountingConnector {
        fn connect(&self, identity: Option<&Identity>) -> Result<Arc<dyn LedgerActor>, LedgerError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullActor(identity.map(|i| i.subject.clone()))))
        }
    }

    const IDLE: i64 = 3_600;

    fn identity(subject: &str, expires_at: i64) -> Identity {
        Identity {
            subject: subject.into(),
            token: format!("token-{}", subject),
            expires_at,
        }
    }

    #[test]
    fn handle_is_built_once_per_session() {
        let connector = Arc::new(CountingConnector::default());
        let handles = LedgerHandles::new(connector.clone(), IDLE);
        let alice = identity("alice", 1_000);

        handles.acquire_at("s1", Some(&alice), 10).unwrap();
        handles.acquire_at("s1", Some(&alice), 20).unwrap();
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);

        handles.acquire_at("s2", Some(&alice), 20).unwrap();
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_a_new_handle() {
        let connector = Arc::new(CountingConnector::default());
        let handles = LedgerHandles::new(connector.clone(), IDLE);
        let alice = identity("alice", 1_000);

        handles.acquire_at("s1", Some(&alice), 10).unwrap();
        assert!(handles.invalidate("s1"));
        assert!(handles.is_empty());

        handles.acquire_at("s1", Some(&alice), 10).unwrap();
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn expired_identity_drops_the_handle() {
        let connector = Arc::new(CountingConnector::default());
        let handles = LedgerHandles::new(connector.clone(), IDLE);
        let alice = identity("alice", 100);

        handles.acquire_at("s1", Some(&alice), 10).unwrap();
        let err = handles.acquire_at("s1", Some(&alice), 100).err().unwrap();

        assert!(matches!(err, LedgerError::Unauthenticated));
        assert!(handles.is_empty());
    }

    #[test]
    fn identity_switch_rebuilds_the_handle() {
        let connector = Arc::new(CountingConnector::default());
        let handles = LedgerHandles::new(connector.clone(), IDLE);

        handles.acquire_at("s1", None, 10).unwrap();
        let actor = handles
            .acquire_at("s1", Some(&identity("bob", 1_000)), 10)
            .unwrap();

        assert_eq!(actor.principal(), Some("bob"));
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
        assert_eq!(handles.len(), 1);
    }

    #[test]
    fn abandoned_sessions_are_evicted() {
        let connector = Arc::new(CountingConnector::default());
        let handles = LedgerHandles::new(connector.clone(), IDLE);

        handles.acquire_at("expiring", Some(&identity("alice", 500)), 10).unwrap();
        handles.acquire_at("idle", None, 10).unwrap();
        handles.acquire_at("active", Some(&identity("bob", 1_000_000)), 10).unwrap();
        assert_eq!(handles.len(), 3);

        // Keep one session in use past the others
        handles
            .acquire_at("active", Some(&identity("bob", 1_000_000)), 3_000)
            .unwrap();

        assert_eq!(handles.evict_stale_at(IDLE + 100), 2);
        assert_eq!(handles.len(), 1);
        assert!(!handles.invalidate("idle"));
        assert!(handles.invalidate("active"));
    }

    #[test]
    fn new_handle_sweeps_stale_ones() {
        let connector = Arc::new(CountingConnector::default());
        let handles = LedgerHandles::new(connector.clone(), IDLE);

        for key in ["s1", "s2", "s3"] {
            handles.acquire_at(key, None, 0).unwrap();
        }
        handles.acquire_at("s4", None, IDLE).unwrap();

        assert_eq!(handles.len(), 1);
        assert!(handles.invalidate("s4"));
    }
}
