mod categories;
mod journals;
mod methods;
mod resources;
mod topics;

pub use categories::CategoryStore;
pub use journals::JournalStore;
pub use methods::MethodStore;
pub use resources::ResourceStore;
pub use topics::TopicStore;

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::AuthState;
use crate::error::StoreError;
use crate::notify::Notifier;
use crate::remote::RemoteBackend;

/// In-memory collection shared between a store and the sync coordinator.
/// Mutated only through the owning store's methods (and wholesale
/// replacement during a fetch).
pub type Collection<T> = Arc<RwLock<Vec<T>>>;

/// Store-side handle for requesting a full re-fetch from the coordinator.
///
/// Used after a failed remote update or delete, where the optimistic state
/// has no snapshot to roll back to and the source of truth must be
/// re-pulled instead.
#[derive(Clone)]
pub struct ResyncHandle(mpsc::UnboundedSender<()>);

impl ResyncHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    pub fn request(&self) {
        // The coordinator may already be gone during teardown.
        let _ = self.0.send(());
    }
}

/// Dependencies shared by every entity store.
#[derive(Clone)]
pub struct StoreCtx {
    pub backend: Arc<dyn RemoteBackend>,
    pub auth: Arc<AuthState>,
    pub notifier: Arc<dyn Notifier>,
    pub resync: ResyncHandle,
}

/// Resolved write mode for one mutation. Demo mode stays local; everything
/// else requires an authenticated identity before any state changes.
pub(crate) enum WriteMode {
    Local,
    Remote(Uuid),
}

impl StoreCtx {
    pub(crate) async fn write_mode(&self) -> Result<WriteMode, StoreError> {
        if self.auth.snapshot().demo_mode {
            return Ok(WriteMode::Local);
        }
        match self.auth.current_identity().await {
            Some(owner) => Ok(WriteMode::Remote(owner)),
            None => {
                self.notifier.error("You need to be signed in to save data");
                Err(StoreError::SignedOut)
            }
        }
    }
}

pub(crate) fn require_non_empty(
    notifier: &dyn Notifier,
    field: &'static str,
    value: &str,
) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        let err = StoreError::validation(field, "must not be empty");
        notifier.error(&err.to_string());
        Err(err)
    } else {
        Ok(())
    }
}

/// The five entity stores wired to one shared context.
pub struct Stores {
    pub topics: Arc<TopicStore>,
    pub methods: Arc<MethodStore>,
    pub journals: Arc<JournalStore>,
    pub resources: Arc<ResourceStore>,
    pub categories: Arc<CategoryStore>,
}

impl Stores {
    pub fn new(ctx: StoreCtx) -> Self {
        let methods = Arc::new(MethodStore::new(ctx.clone()));
        let journals = Arc::new(JournalStore::new(ctx.clone()));
        let resources = Arc::new(ResourceStore::new(ctx.clone()));
        let topics = Arc::new(TopicStore::new(
            ctx.clone(),
            Arc::clone(&methods),
            Arc::clone(&journals),
            Arc::clone(&resources),
        ));
        let categories = Arc::new(CategoryStore::new(ctx, topics.collection()));
        Self {
            topics,
            methods,
            journals,
            resources,
            categories,
        }
    }
}
