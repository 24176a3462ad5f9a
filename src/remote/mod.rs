pub mod memory;
mod rows;

pub use memory::MemoryBackend;
pub use rows::{
    CategoryPatchRow, CategoryRow, JournalPatchRow, JournalRow, MethodPatchRow, MethodRow,
    ResourcePatchRow, ResourceRow, TopicPatchRow, TopicRow,
};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

/// The five remote tables this client reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Topics,
    LearningMethods,
    JournalEntries,
    Resources,
    Categories,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Topics,
        Table::LearningMethods,
        Table::JournalEntries,
        Table::Resources,
        Table::Categories,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Topics => "topics",
            Table::LearningMethods => "learning_methods",
            Table::JournalEntries => "journal_entries",
            Table::Resources => "resources",
            Table::Categories => "categories",
        }
    }
}

/// External change notification. Carries no row payload: any event against a
/// table triggers a wholesale re-fetch, so discrimination would be unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
}

/// Persistence boundary to the backend-as-a-service.
///
/// Reads are scoped to an owner and used only by the bulk fetch; mutations
/// are scoped to id + owner and report success or failure through `Result`
/// so the calling store can decide between rollback and re-fetch. Insert
/// rows carry a mandatory `user_id`, making an anonymous write to an
/// authenticated table unrepresentable. Updates carry only the patched
/// columns; untouched columns are never sent.
#[mockall::automock]
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn list_topics(&self, owner: Uuid) -> Result<Vec<TopicRow>>;
    async fn insert_topic(&self, row: TopicRow) -> Result<()>;
    async fn update_topic(&self, id: Uuid, patch: TopicPatchRow, owner: Uuid) -> Result<()>;
    async fn delete_topic(&self, id: Uuid, owner: Uuid) -> Result<()>;

    async fn list_methods(&self, owner: Uuid) -> Result<Vec<MethodRow>>;
    async fn insert_method(&self, row: MethodRow) -> Result<()>;
    async fn update_method(&self, id: Uuid, patch: MethodPatchRow, owner: Uuid) -> Result<()>;
    async fn delete_method(&self, id: Uuid, owner: Uuid) -> Result<()>;

    async fn list_journals(&self, owner: Uuid) -> Result<Vec<JournalRow>>;
    async fn insert_journal(&self, row: JournalRow) -> Result<()>;
    async fn update_journal(&self, id: Uuid, patch: JournalPatchRow, owner: Uuid) -> Result<()>;
    async fn delete_journal(&self, id: Uuid, owner: Uuid) -> Result<()>;

    async fn list_resources(&self, owner: Uuid) -> Result<Vec<ResourceRow>>;
    async fn insert_resource(&self, row: ResourceRow) -> Result<()>;
    async fn update_resource(&self, id: Uuid, patch: ResourcePatchRow, owner: Uuid) -> Result<()>;
    async fn delete_resource(&self, id: Uuid, owner: Uuid) -> Result<()>;

    async fn list_categories(&self, owner: Uuid) -> Result<Vec<CategoryRow>>;
    async fn insert_category(&self, row: CategoryRow) -> Result<()>;
    async fn update_category(&self, id: Uuid, patch: CategoryPatchRow, owner: Uuid) -> Result<()>;
    async fn delete_category(&self, id: Uuid, owner: Uuid) -> Result<()>;

    /// Subscribes to change notifications for one table.
    fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent>;
}
