//! Shared fixtures for unit and integration tests.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::AuthState;
use crate::notify::Notifier;
use crate::remote::{MemoryBackend, RemoteBackend};
use crate::seed::SeedData;
use crate::store::{ResyncHandle, StoreCtx, Stores};
use crate::sync::SyncCoordinator;

/// Captures notifications instead of presenting them.
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            successes: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

/// One fully wired store stack over a fresh in-memory backend, minus the
/// context driver, so tests control exactly when fetches happen.
pub struct TestHarness {
    pub backend: Arc<MemoryBackend>,
    pub auth: Arc<AuthState>,
    pub notifier: Arc<RecordingNotifier>,
    pub ctx: StoreCtx,
    pub stores: Arc<Stores>,
    pub seed: SeedData,
    pub resync_rx: mpsc::UnboundedReceiver<()>,
}

impl TestHarness {
    pub fn demo() -> Self {
        Self::with_auth(AuthState::demo())
    }

    pub fn signed_in(owner: Uuid) -> Self {
        Self::with_auth(AuthState::signed_in(owner))
    }

    pub fn anonymous() -> Self {
        Self::with_auth(AuthState::anonymous())
    }

    pub fn loading() -> Self {
        Self::with_auth(AuthState::new())
    }

    fn with_auth(auth: AuthState) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let auth = Arc::new(auth);
        let notifier = Arc::new(RecordingNotifier::new());
        let (resync, resync_rx) = ResyncHandle::channel();
        let ctx = StoreCtx {
            backend: Arc::clone(&backend) as Arc<dyn RemoteBackend>,
            auth: Arc::clone(&auth),
            notifier: Arc::clone(&notifier) as Arc<dyn Notifier>,
            resync,
        };
        let stores = Arc::new(Stores::new(ctx.clone()));
        Self {
            backend,
            auth,
            notifier,
            ctx,
            stores,
            seed: SeedData::demo(),
            resync_rx,
        }
    }

    pub fn coordinator(&self) -> SyncCoordinator {
        SyncCoordinator::new(
            Arc::clone(&self.backend) as Arc<dyn RemoteBackend>,
            Arc::clone(&self.auth),
            self.seed.clone(),
            Arc::clone(&self.stores),
        )
    }
}

/// Polls until `predicate` holds or the timeout elapses. Returns the final
/// predicate result.
pub async fn wait_until(mut predicate: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    predicate()
}
