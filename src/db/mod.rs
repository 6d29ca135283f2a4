use std::collections::hash_map::{Entry, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::auth::{AuthCodeStore, PendingRequestStore};
use crate::core::models::{AuthCodeData, PendingAuthRequest};
use crate::core::types::{Expire, HashedAuthCode, RequestId};
use crate::provider::error::Error;

use tracing::{event, Level};

pub mod audit;
pub mod clients;
pub mod models;

pub use audit::{FileTokenLog, MemoryTokenLog};
pub use clients::StaticClientRegistry;

struct Expiring<V> {
    value: V,
    /// `None` when the ttl reaches past what `Instant` can represent.
    invalid_after: Option<Instant>,
}

impl<V> Expiring<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.invalid_after.map_or(true, |deadline| now < deadline)
    }
}

/// A map whose entries are created once, taken once, and forgotten once expired.
///
/// Every operation runs under a single lock, so `take` is an atomic check-and-delete.
struct ExpiringMap<K, V> {
    name: &'static str,
    ttl: Duration,
    entries: Mutex<HashMap<K, Expiring<V>>>,
}

impl<K: Eq + Hash, V> ExpiringMap<K, V> {
    fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn insert(&self, key: K, value: V) -> Result<(), Error> {
        let invalid_after = Instant::now().checked_add(self.ttl);
        let mut entries = self.entries.lock()?;
        match entries.entry(key) {
            Entry::Occupied(_) => Err(Error::Conflict(self.name)),
            Entry::Vacant(slot) => {
                slot.insert(Expiring {
                    value,
                    invalid_after,
                });
                Ok(())
            }
        }
    }

    fn take(&self, key: &K) -> Result<Option<V>, Error> {
        let entry = self.entries.lock()?.remove(key);
        Ok(entry
            .filter(|e| e.is_live(Instant::now()))
            .map(|e| e.value))
    }

    fn evict_expired(&self) -> Result<usize, Error> {
        let now = Instant::now();
        let mut entries = self.entries.lock()?;
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        Ok(before - entries.len())
    }

    fn len(&self) -> Result<usize, Error> {
        Ok(self.entries.lock()?.len())
    }
}

/// In-process storage for pending authorization requests and issued codes.
///
/// The two key spaces are guarded by independent locks.
pub struct MemoryStore {
    requests: ExpiringMap<RequestId, PendingAuthRequest>,
    codes: ExpiringMap<HashedAuthCode, AuthCodeData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_ttl(
            PendingAuthRequest::expires_in(),
            AuthCodeData::expires_in(),
        )
    }

    pub fn with_ttl(request_ttl: Duration, code_ttl: Duration) -> Self {
        Self {
            requests: ExpiringMap::new("pending requests", request_ttl),
            codes: ExpiringMap::new("authorization codes", code_ttl),
        }
    }

    pub fn pending_requests(&self) -> Result<usize, Error> {
        self.requests.len()
    }

    pub fn outstanding_codes(&self) -> Result<usize, Error> {
        self.codes.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("request_ttl", &self.requests.ttl)
            .field("code_ttl", &self.codes.ttl)
            .finish()
    }
}

impl PendingRequestStore for MemoryStore {
    fn store_request(&self, req: PendingAuthRequest) -> Result<RequestId, Error> {
        let id = req.id.clone();
        self.requests.insert(id.clone(), req)?;
        Ok(id)
    }

    fn take_request(&self, id: &RequestId) -> Result<Option<PendingAuthRequest>, Error> {
        self.requests.take(id)
    }

    fn clean_up(&self) -> Result<usize, Error> {
        let evicted = self.requests.evict_expired()?;
        if evicted > 0 {
            event!(Level::DEBUG, evicted, "Evicted expired authorization requests");
        }
        Ok(evicted)
    }
}

impl AuthCodeStore for MemoryStore {
    fn store_code(&self, data: AuthCodeData) -> Result<(), Error> {
        self.codes.insert(data.code.clone(), data)
    }

    fn take_code(&self, code: &HashedAuthCode) -> Result<Option<AuthCodeData>, Error> {
        self.codes.take(code)
    }

    fn clean_up(&self) -> Result<usize, Error> {
        let evicted = self.codes.evict_expired()?;
        if evicted > 0 {
            event!(Level::DEBUG, evicted, "Evicted expired authorization codes");
        }
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ClientId, RedirectUri, ResponseType};
    use std::sync::Arc;

    fn pending(id: &str) -> PendingAuthRequest {
        PendingAuthRequest {
            id: RequestId(id.to_string()),
            client_id: ClientId("c1".to_string()),
            redirect_uri: RedirectUri("http://localhost:9000/callback".to_string()),
            response_type: ResponseType::Code,
            state: Some("xyz".to_string()),
        }
    }

    fn code(hash: &str) -> AuthCodeData {
        AuthCodeData {
            code: HashedAuthCode(hash.to_string()),
            client_id: ClientId("c1".to_string()),
            redirect_uri: RedirectUri("http://localhost:9000/callback".to_string()),
            state: None,
        }
    }

    #[test]
    fn requests_are_taken_once() {
        let store = MemoryStore::new();
        let id = store.store_request(pending("r1")).unwrap();

        let taken = store.take_request(&id).unwrap().unwrap();
        assert_eq!(taken.state.as_deref(), Some("xyz"));
        assert!(store.take_request(&id).unwrap().is_none());
        assert_eq!(store.pending_requests().unwrap(), 0);
    }

    #[test]
    fn colliding_ids_are_refused() {
        let store = MemoryStore::new();
        store.store_request(pending("r1")).unwrap();
        assert!(matches!(
            store.store_request(pending("r1")),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn codes_are_taken_once() {
        let store = MemoryStore::new();
        store.store_code(code("h1")).unwrap();

        let key = HashedAuthCode("h1".to_string());
        assert!(store.take_code(&key).unwrap().is_some());
        assert!(store.take_code(&key).unwrap().is_none());
    }

    #[test]
    fn expired_entries_behave_as_absent() {
        let store = MemoryStore::with_ttl(Duration::ZERO, Duration::ZERO);
        let id = store.store_request(pending("r1")).unwrap();
        store.store_code(code("h1")).unwrap();

        assert!(store.take_request(&id).unwrap().is_none());
        assert!(store
            .take_code(&HashedAuthCode("h1".to_string()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn clean_up_evicts_only_expired_entries() {
        let store = MemoryStore::with_ttl(Duration::ZERO, Duration::from_secs(60));
        store.store_request(pending("r1")).unwrap();
        store.store_request(pending("r2")).unwrap();
        store.store_code(code("h1")).unwrap();

        assert_eq!(PendingRequestStore::clean_up(&store).unwrap(), 2);
        assert_eq!(AuthCodeStore::clean_up(&store).unwrap(), 0);
        assert_eq!(store.pending_requests().unwrap(), 0);
        assert_eq!(store.outstanding_codes().unwrap(), 1);
    }

    #[test]
    fn oversized_ttl_never_expires() {
        let store = MemoryStore::with_ttl(Duration::from_secs(u64::MAX), Duration::MAX);
        let id = store.store_request(pending("r1")).unwrap();
        store.store_code(code("h1")).unwrap();

        assert_eq!(PendingRequestStore::clean_up(&store).unwrap(), 0);
        assert_eq!(AuthCodeStore::clean_up(&store).unwrap(), 0);
        assert!(store.take_request(&id).unwrap().is_some());
        assert!(store
            .take_code(&HashedAuthCode("h1".to_string()))
            .unwrap()
            .is_some());
    }

    #[test]
    fn concurrent_takes_yield_a_single_winner() {
        let store = Arc::new(MemoryStore::new());
        store.store_code(code("contested")).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .take_code(&HashedAuthCode("contested".to_string()))
                        .unwrap()
                        .is_some()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
