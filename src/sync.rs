use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::AuthState;
use crate::remote::RemoteBackend;
use crate::seed::SeedData;
use crate::store::{ResyncHandle, Stores};

/// Decides which data source populates the entity stores and keeps them in
/// sync with remote change notifications.
///
/// Three inputs drive it: the auth loading flag (inert while set), demo mode
/// (seed data, never a remote call), and session presence (bulk fetch scoped
/// to the identity, seed preview when absent).
pub struct SyncCoordinator {
    backend: Arc<dyn RemoteBackend>,
    auth: Arc<AuthState>,
    seed: SeedData,
    stores: Arc<Stores>,
    fetch_in_flight: AtomicBool,
    data_fetched: AtomicBool,
    is_loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl SyncCoordinator {
    pub fn new(
        backend: Arc<dyn RemoteBackend>,
        auth: Arc<AuthState>,
        seed: SeedData,
        stores: Arc<Stores>,
    ) -> Self {
        Self {
            backend,
            auth,
            seed,
            stores,
            fetch_in_flight: AtomicBool::new(false),
            data_fetched: AtomicBool::new(false),
            is_loading: AtomicBool::new(true),
            error: Mutex::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::SeqCst)
    }

    pub fn data_fetched(&self) -> bool {
        self.data_fetched.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    /// Populates the stores from the source the current auth state selects.
    ///
    /// Idempotent and re-entrant-safe: a fetch already in flight causes a
    /// concurrent invocation to no-op rather than queue.
    pub async fn fetch_data(&self) {
        let snap = self.auth.snapshot();
        if snap.loading {
            // Consumers keep seeing the loading flag until auth resolves.
            debug!("auth state still resolving, skipping fetch");
            return;
        }
        if self
            .fetch_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("fetch already in flight, dropping request");
            return;
        }

        self.is_loading.store(true, Ordering::SeqCst);
        *self.error.lock() = None;

        if snap.demo_mode {
            info!("demo mode active, using local data");
            self.apply_seed();
            self.data_fetched.store(true, Ordering::SeqCst);
        } else if let Some(session) = snap.session {
            match self.fetch_remote(session.user_id).await {
                Ok(()) => {
                    info!(user_id = %session.user_id, "data fetched for authenticated user");
                    self.data_fetched.store(true, Ordering::SeqCst);
                }
                Err(e) => {
                    error!(error = %e, "bulk fetch failed, falling back to local data");
                    *self.error.lock() =
                        Some("Failed to load data. Using local data instead.".to_string());
                    self.apply_seed();
                }
            }
        } else {
            // Logged-out preview: same content as demo mode, different intent.
            info!("no authenticated user, using local data");
            self.apply_seed();
        }

        self.is_loading.store(false, Ordering::SeqCst);
        self.fetch_in_flight.store(false, Ordering::SeqCst);
    }

    fn apply_seed(&self) {
        self.stores.topics.replace(self.seed.topics.clone());
        self.stores.methods.replace(self.seed.methods.clone());
        self.stores.journals.replace(self.seed.journals.clone());
        self.stores.resources.replace(self.seed.resources.clone());
        self.stores.categories.replace(self.seed.categories.clone());
    }

    /// Bulk fetch: all five collections for one identity, transformed and
    /// swapped in wholesale. A kind whose remote collection is empty falls
    /// back to its seed data so a brand-new account still sees onboarding
    /// content.
    async fn fetch_remote(&self, owner: Uuid) -> anyhow::Result<()> {
        let topic_rows = self.backend.list_topics(owner).await?;
        let method_rows = self.backend.list_methods(owner).await?;
        let journal_rows = self.backend.list_journals(owner).await?;
        let resource_rows = self.backend.list_resources(owner).await?;
        let category_rows = self.backend.list_categories(owner).await?;

        let topics: Vec<_> = topic_rows.into_iter().map(|r| r.into_topic()).collect();
        let methods: Vec<_> = method_rows.into_iter().map(|r| r.into_method()).collect();
        let journals: Vec<_> = journal_rows.into_iter().map(|r| r.into_journal()).collect();
        let resources: Vec<_> = resource_rows
            .into_iter()
            .map(|r| r.into_resource())
            .collect();
        let categories: Vec<_> = category_rows
            .into_iter()
            .map(|r| r.into_category())
            .collect();

        self.stores.topics.replace(if topics.is_empty() {
            self.seed.topics.clone()
        } else {
            topics
        });
        self.stores.methods.replace(if methods.is_empty() {
            self.seed.methods.clone()
        } else {
            methods
        });
        self.stores.journals.replace(if journals.is_empty() {
            self.seed.journals.clone()
        } else {
            journals
        });
        self.stores.resources.replace(if resources.is_empty() {
            self.seed.resources.clone()
        } else {
            resources
        });
        self.stores.categories.replace(if categories.is_empty() {
            self.seed.categories.clone()
        } else {
            categories
        });
        Ok(())
    }

    /// Spawns one listener per table. Any change notification, regardless of
    /// row or event type, funnels into a resync request: coarse invalidation
    /// at the cost of over-fetching.
    pub fn subscribe_realtime(&self, resync: &ResyncHandle) -> Vec<JoinHandle<()>> {
        crate::remote::Table::ALL
            .into_iter()
            .map(|table| {
                let mut rx = self.backend.subscribe(table);
                let resync = resync.clone();
                tokio::spawn(async move {
                    use tokio::sync::broadcast::error::RecvError;
                    loop {
                        match rx.recv().await {
                            Ok(_) => resync.request(),
                            // Missed events still mean "something changed".
                            Err(RecvError::Lagged(_)) => resync.request(),
                            Err(RecvError::Closed) => break,
                        }
                    }
                })
            })
            .collect()
    }
}
