//! Conversation store: session identifier → chat session handle.
//!
//! Handles are created lazily on first use and live until the store is
//! cleared or dropped, unless a max-entries cap evicts the least recently
//! used one. Each handle has its own mutex, so turns for one identifier are
//! serialized while other identifiers proceed independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use prinix_core::{ChatBackend, ChatSession, SessionId};

pub type ConversationHandle = Arc<Mutex<Box<dyn ChatSession>>>;

struct Entry {
    handle: ConversationHandle,
    last_used: AtomicU64,
}

pub struct ConversationStore {
    backend: Arc<dyn ChatBackend>,
    entries: RwLock<HashMap<SessionId, Entry>>,
    /// 0 means unbounded.
    max_entries: usize,
    clock: AtomicU64,
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            entries: RwLock::new(HashMap::new()),
            max_entries: 0,
            clock: AtomicU64::new(0),
        }
    }

    /// Cap the number of live conversations; 0 disables the cap.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Return the handle for `id`, starting a new chat session on first use.
    pub async fn handle(&self, id: &SessionId) -> ConversationHandle {
        if let Some(entry) = self.entries.read().await.get(id) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return Arc::clone(&entry.handle);
        }

        let mut entries = self.entries.write().await;
        // Another request may have created it while we waited for the lock.
        if let Some(entry) = entries.get(id) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return Arc::clone(&entry.handle);
        }

        if self.max_entries > 0 && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.last_used.load(Ordering::Relaxed))
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!(session = %oldest, "Evicting least recently used conversation");
                entries.remove(&oldest);
            }
        }

        let handle: ConversationHandle = Arc::new(Mutex::new(self.backend.start_chat()));
        entries.insert(
            id.clone(),
            Entry {
                handle: Arc::clone(&handle),
                last_used: AtomicU64::new(self.tick()),
            },
        );
        info!(session = %id, backend = self.backend.name(), "Started conversation");
        handle
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.entries.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every conversation (shutdown).
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        info!(count = entries.len(), "Clearing conversations");
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockBackend;

    #[tokio::test]
    async fn test_same_id_reuses_handle() {
        let backend = MockBackend::new();
        let store = ConversationStore::new(Arc::new(backend.clone()));
        let id = SessionId::from("a");

        let first = store.handle(&id).await;
        let second = store.handle(&id).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(backend.sessions_created(), 1);

        store.handle(&SessionId::from("b")).await;
        assert_eq!(backend.sessions_created(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_cap_evicts_least_recently_used() {
        let backend = MockBackend::new();
        let store = ConversationStore::new(Arc::new(backend.clone())).with_max_entries(2);
        let (a, b, c) = (SessionId::from("a"), SessionId::from("b"), SessionId::from("c"));

        store.handle(&a).await;
        store.handle(&b).await;
        store.handle(&a).await; // a is now the most recent
        store.handle(&c).await;

        assert_eq!(store.len().await, 2);
        assert!(store.contains(&a).await);
        assert!(!store.contains(&b).await);
        assert!(store.contains(&c).await);
    }

    #[tokio::test]
    async fn test_concurrent_first_use_creates_once() {
        let backend = MockBackend::new();
        let store = Arc::new(ConversationStore::new(Arc::new(backend.clone())));
        let id = SessionId::from("same");

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                tokio::spawn(async move { store.handle(&id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(backend.sessions_created(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = ConversationStore::new(Arc::new(MockBackend::new()));
        store.handle(&SessionId::from("a")).await;
        store.clear().await;
        assert!(store.is_empty().await);
    }
}
