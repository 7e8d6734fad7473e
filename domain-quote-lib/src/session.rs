//! Session (cart) lifecycle.
//!
//! Every lookup must be scoped to a registrar session. Sessions are cheap
//! but not free, and a batch shares one between all of its workers, so the
//! manager hands out the cached session while it is younger than the TTL
//! and refreshes it at most once when it goes stale, no matter how many
//! workers notice at the same time.

use crate::error::DomainQuoteError;
use crate::protocols::RegistrarApi;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// A registrar session token and the moment it was obtained.
#[derive(Debug)]
pub struct Session {
    token: String,
    obtained_at: Instant,
}

impl Session {
    fn new(token: String) -> Self {
        Self {
            token,
            obtained_at: Instant::now(),
        }
    }

    /// Opaque token to scope lookups with
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn age(&self) -> Duration {
        self.obtained_at.elapsed()
    }

    /// A session is usable while strictly younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Owns the current session and refreshes it when it expires.
pub struct SessionManager {
    api: Arc<dyn RegistrarApi>,
    ttl: Duration,
    /// Published session; replaced wholesale, never edited
    current: RwLock<Option<Arc<Session>>>,
    /// Serializes refreshes; held across the network call
    refresh_lock: Mutex<()>,
    refreshes: AtomicUsize,
}

impl SessionManager {
    pub fn new(api: Arc<dyn RegistrarApi>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            refreshes: AtomicUsize::new(0),
        }
    }

    /// Return a session that is fresh right now, creating one if needed.
    ///
    /// Callers that arrive while a refresh is underway wait for it and then
    /// reuse its result instead of issuing their own.
    ///
    /// # Errors
    ///
    /// Returns `DomainQuoteError::NetworkError` if a refresh was needed and
    /// failed. The previously cached session, if any, is left in place.
    pub async fn valid_session(&self) -> Result<Arc<Session>, DomainQuoteError> {
        if let Some(session) = self.fresh_cached() {
            return Ok(session);
        }

        let _guard = self.refresh_lock.lock().await;

        // Someone else may have refreshed while we waited for the lock
        if let Some(session) = self.fresh_cached() {
            return Ok(session);
        }

        self.refreshes.fetch_add(1, Ordering::SeqCst);
        debug!(ttl_secs = self.ttl.as_secs(), "Session missing or stale, refreshing");

        let token = self.api.create_session().await.map_err(|e| {
            warn!(error = %e, "Could not get a registrar session");
            match e {
                DomainQuoteError::NetworkError { .. } => e,
                other => DomainQuoteError::network_with_source(
                    "Could not create registrar session",
                    other.to_string(),
                ),
            }
        })?;

        let session = Arc::new(Session::new(token));
        *self.current.write() = Some(Arc::clone(&session));

        Ok(session)
    }

    /// The cached session regardless of age.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.read().clone()
    }

    /// Forget the cached session so the next caller refreshes.
    pub fn invalidate(&self) {
        *self.current.write() = None;
    }

    /// How many refresh calls have been issued so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn fresh_cached(&self) -> Option<Arc<Session>> {
        self.current
            .read()
            .as_ref()
            .filter(|session| session.is_fresh(self.ttl))
            .cloned()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .field("current", &self.current())
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::Offer;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;

    /// Hands out "cart-1", "cart-2", ... after a short simulated round trip.
    struct CountingCarts {
        created: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingCarts {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                created: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl RegistrarApi for CountingCarts {
        async fn create_session(&self) -> Result<String, DomainQuoteError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(DomainQuoteError::network_with_status("cart refused", 503));
            }
            let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("cart-{}", n))
        }

        async fn offers(&self, _token: &str, _domain: &str) -> Result<Vec<Offer>, DomainQuoteError> {
            Ok(Vec::new())
        }

        async fn tld_catalog(&self) -> Result<Vec<String>, DomainQuoteError> {
            Ok(Vec::new())
        }
    }

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_refresh() {
        let api = CountingCarts::new();
        let manager = Arc::new(SessionManager::new(api.clone(), TTL));

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.valid_session().await })
            })
            .collect();

        for handle in handles {
            let session = handle.await.unwrap().unwrap();
            assert_eq!(session.token(), "cart-1");
        }

        assert_eq!(manager.refresh_count(), 1);
        assert_eq!(api.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reuse_within_ttl() {
        let api = CountingCarts::new();
        let manager = SessionManager::new(api.clone(), TTL);

        let first = manager.valid_session().await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        let second = manager.valid_session().await.unwrap();

        assert_eq!(first.token(), second.token());
        assert_eq!(manager.refresh_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_session_refreshes_exactly_once() {
        let api = CountingCarts::new();
        let manager = SessionManager::new(api.clone(), TTL);

        manager.valid_session().await.unwrap();
        tokio::time::advance(TTL).await;

        let refreshed = manager.valid_session().await.unwrap();
        assert_eq!(refreshed.token(), "cart-2");
        assert_eq!(manager.refresh_count(), 2);

        // Fresh again: no further refresh
        manager.valid_session().await.unwrap();
        assert_eq!(manager.refresh_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_old_session() {
        let api = CountingCarts::new();
        let manager = SessionManager::new(api.clone(), TTL);

        manager.valid_session().await.unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        api.fail.store(true, Ordering::SeqCst);

        let err = manager.valid_session().await.unwrap_err();
        assert!(matches!(err, DomainQuoteError::NetworkError { .. }));
        assert_eq!(manager.current().unwrap().token(), "cart-1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_refresh() {
        let api = CountingCarts::new();
        let manager = SessionManager::new(api.clone(), TTL);

        manager.valid_session().await.unwrap();
        manager.invalidate();
        assert!(manager.current().is_none());

        let session = manager.valid_session().await.unwrap();
        assert_eq!(session.token(), "cart-2");
    }
}
