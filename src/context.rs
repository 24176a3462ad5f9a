use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthState;
use crate::domain::{Topic, TopicStatus};
use crate::notify::Notifier;
use crate::remote::RemoteBackend;
use crate::seed::SeedData;
use crate::store::{ResyncHandle, StoreCtx, Stores};
use crate::sync::SyncCoordinator;

/// Topic totals per status, as shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Single handle the presentation layer consumes: the five stores, the sync
/// coordinator's flags, and nothing else. Composition only; every behavior
/// lives in the stores or the coordinator.
///
/// Construction performs the initial population for the current auth state
/// and spawns a driver task that re-fetches on every auth change and on
/// every resync request, renewing change subscriptions across identity
/// changes.
pub struct LearningContext {
    pub topics: Arc<crate::store::TopicStore>,
    pub methods: Arc<crate::store::MethodStore>,
    pub journals: Arc<crate::store::JournalStore>,
    pub resources: Arc<crate::store::ResourceStore>,
    pub categories: Arc<crate::store::CategoryStore>,
    coordinator: Arc<SyncCoordinator>,
    driver: Mutex<Option<JoinHandle<()>>>,
    subscriptions: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl LearningContext {
    pub async fn new(
        backend: Arc<dyn RemoteBackend>,
        auth: Arc<AuthState>,
        seed: SeedData,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (resync, mut resync_rx) = ResyncHandle::channel();
        let ctx = StoreCtx {
            backend: Arc::clone(&backend),
            auth: Arc::clone(&auth),
            notifier,
            resync: resync.clone(),
        };
        let stores = Arc::new(Stores::new(ctx));
        let coordinator = Arc::new(SyncCoordinator::new(
            backend,
            Arc::clone(&auth),
            seed,
            Arc::clone(&stores),
        ));

        coordinator.fetch_data().await;
        let subscriptions = Arc::new(Mutex::new(if Self::wants_realtime(&auth) {
            coordinator.subscribe_realtime(&resync)
        } else {
            Vec::new()
        }));

        let mut auth_rx = auth.subscribe();
        let driver = {
            let coordinator = Arc::clone(&coordinator);
            let auth = Arc::clone(&auth);
            let subscriptions = Arc::clone(&subscriptions);
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        changed = auth_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            auth_rx.borrow_and_update();
                            debug!("auth state changed, refetching");
                            // Drop stale listeners before switching identities.
                            for handle in subscriptions.lock().drain(..) {
                                handle.abort();
                            }
                            coordinator.fetch_data().await;
                            if Self::wants_realtime(&auth) {
                                let renewed = coordinator.subscribe_realtime(&resync);
                                *subscriptions.lock() = renewed;
                            }
                        }
                        request = resync_rx.recv() => {
                            if request.is_none() {
                                break;
                            }
                            coordinator.fetch_data().await;
                        }
                    }
                }
            })
        };

        Self {
            topics: Arc::clone(&stores.topics),
            methods: Arc::clone(&stores.methods),
            journals: Arc::clone(&stores.journals),
            resources: Arc::clone(&stores.resources),
            categories: Arc::clone(&stores.categories),
            coordinator,
            driver: Mutex::new(Some(driver)),
            subscriptions,
        }
    }

    fn wants_realtime(auth: &AuthState) -> bool {
        let snap = auth.snapshot();
        !snap.loading && !snap.demo_mode && snap.session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    pub fn data_fetched(&self) -> bool {
        self.coordinator.data_fetched()
    }

    pub fn error(&self) -> Option<String> {
        self.coordinator.error()
    }

    /// Manual refetch, same path as an external change notification.
    pub async fn refetch(&self) {
        self.coordinator.fetch_data().await;
    }

    pub fn journal_tag_suggestions(&self, editing: Option<Uuid>) -> Vec<String> {
        self.journals.tag_suggestions(editing)
    }

    pub fn resource_tag_suggestions(&self, editing: Option<Uuid>) -> Vec<String> {
        self.resources.tag_suggestions(editing)
    }

    pub fn topic_status_counts(&self) -> StatusCounts {
        let topics: Vec<Topic> = self.topics.all();
        let mut counts = StatusCounts {
            total: topics.len(),
            ..Default::default()
        };
        for topic in &topics {
            match topic.status {
                TopicStatus::NotStarted => counts.not_started += 1,
                TopicStatus::InProgress => counts.in_progress += 1,
                TopicStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }

    /// Stops the driver task and releases every change subscription.
    pub fn shutdown(&self) {
        if let Some(handle) = self.driver.lock().take() {
            handle.abort();
        }
        for handle in self.subscriptions.lock().drain(..) {
            handle.abort();
        }
    }
}

impl Drop for LearningContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}
