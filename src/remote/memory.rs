//! In-memory reference backend.
//!
//! Stands in for the hosted service in tests and local demos: per-table row
//! stores scoped by `user_id`, a change-event broadcast on every mutation,
//! and switchable failure injection so store rollback and re-fetch paths can
//! be exercised deterministically.

use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{
    CategoryPatchRow, CategoryRow, ChangeEvent, JournalPatchRow, JournalRow, MethodPatchRow,
    MethodRow, RemoteBackend, ResourcePatchRow, ResourceRow, Table, TopicPatchRow, TopicRow,
};

pub struct MemoryBackend {
    topics: RwLock<Vec<TopicRow>>,
    methods: RwLock<Vec<MethodRow>>,
    journals: RwLock<Vec<JournalRow>>,
    resources: RwLock<Vec<ResourceRow>>,
    categories: RwLock<Vec<CategoryRow>>,
    channels: HashMap<Table, broadcast::Sender<ChangeEvent>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let channels = Table::ALL
            .into_iter()
            .map(|table| (table, broadcast::channel(64).0))
            .collect();
        Self {
            topics: RwLock::new(Vec::new()),
            methods: RwLock::new(Vec::new()),
            journals: RwLock::new(Vec::new()),
            resources: RwLock::new(Vec::new()),
            categories: RwLock::new(Vec::new()),
            channels,
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent insert/update/delete fail.
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Makes every subsequent list fail.
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    /// Fires a change event as if another client had touched `table`.
    pub fn notify_external_change(&self, table: Table) {
        self.changed(table);
    }

    fn changed(&self, table: Table) {
        // No receivers is fine; nobody has subscribed yet.
        let _ = self.channels[&table].send(ChangeEvent { table });
    }

    fn write_guard(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("injected write failure");
        }
        Ok(())
    }

    fn read_guard(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("injected read failure");
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteBackend for MemoryBackend {
    async fn list_topics(&self, owner: Uuid) -> Result<Vec<TopicRow>> {
        self.read_guard()?;
        Ok(self
            .topics
            .read()
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_topic(&self, row: TopicRow) -> Result<()> {
        self.write_guard()?;
        self.topics.write().push(row);
        self.changed(Table::Topics);
        Ok(())
    }

    async fn update_topic(&self, id: Uuid, patch: TopicPatchRow, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        if let Some(existing) = self
            .topics
            .write()
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
        {
            if let Some(title) = patch.title {
                existing.title = title;
            }
            if let Some(description) = patch.description {
                existing.description = Some(description);
            }
            if let Some(category) = patch.category {
                existing.category = category;
            }
            if let Some(status) = patch.status {
                existing.status = status;
            }
            if let Some(progress) = patch.progress {
                existing.progress = progress;
            }
            if let Some(start_date) = patch.start_date {
                existing.start_date = Some(start_date);
            }
            if let Some(target_end_date) = patch.target_end_date {
                existing.target_end_date = Some(target_end_date);
            }
            if let Some(parent_id) = patch.parent_id {
                existing.parent_id = Some(parent_id);
            }
            existing.updated_at = patch.updated_at;
        }
        self.changed(Table::Topics);
        Ok(())
    }

    async fn delete_topic(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        self.topics
            .write()
            .retain(|r| !(r.id == id && r.user_id == owner));
        self.changed(Table::Topics);
        Ok(())
    }

    async fn list_methods(&self, owner: Uuid) -> Result<Vec<MethodRow>> {
        self.read_guard()?;
        Ok(self
            .methods
            .read()
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_method(&self, row: MethodRow) -> Result<()> {
        self.write_guard()?;
        self.methods.write().push(row);
        self.changed(Table::LearningMethods);
        Ok(())
    }

    async fn update_method(&self, id: Uuid, patch: MethodPatchRow, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        if let Some(existing) = self
            .methods
            .write()
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
        {
            if let Some(kind) = patch.kind {
                existing.kind = kind;
            }
            if let Some(title) = patch.title {
                existing.title = title;
            }
            if let Some(link) = patch.link {
                existing.link = Some(link);
            }
            if let Some(time_spent) = patch.time_spent {
                existing.time_spent = Some(time_spent);
            }
            existing.updated_at = patch.updated_at;
        }
        self.changed(Table::LearningMethods);
        Ok(())
    }

    async fn delete_method(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        self.methods
            .write()
            .retain(|r| !(r.id == id && r.user_id == owner));
        self.changed(Table::LearningMethods);
        Ok(())
    }

    async fn list_journals(&self, owner: Uuid) -> Result<Vec<JournalRow>> {
        self.read_guard()?;
        Ok(self
            .journals
            .read()
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_journal(&self, row: JournalRow) -> Result<()> {
        self.write_guard()?;
        self.journals.write().push(row);
        self.changed(Table::JournalEntries);
        Ok(())
    }

    async fn update_journal(&self, id: Uuid, patch: JournalPatchRow, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        if let Some(existing) = self
            .journals
            .write()
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
        {
            if let Some(content) = patch.content {
                existing.content = content;
            }
            if let Some(tags) = patch.tags {
                existing.tags = Some(tags);
            }
            if let Some(category) = patch.category {
                existing.category = Some(category);
            }
            existing.updated_at = patch.updated_at;
        }
        self.changed(Table::JournalEntries);
        Ok(())
    }

    async fn delete_journal(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        self.journals
            .write()
            .retain(|r| !(r.id == id && r.user_id == owner));
        self.changed(Table::JournalEntries);
        Ok(())
    }

    async fn list_resources(&self, owner: Uuid) -> Result<Vec<ResourceRow>> {
        self.read_guard()?;
        Ok(self
            .resources
            .read()
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_resource(&self, row: ResourceRow) -> Result<()> {
        self.write_guard()?;
        self.resources.write().push(row);
        self.changed(Table::Resources);
        Ok(())
    }

    async fn update_resource(&self, id: Uuid, patch: ResourcePatchRow, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        if let Some(existing) = self
            .resources
            .write()
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
        {
            if let Some(title) = patch.title {
                existing.title = title;
            }
            if let Some(url) = patch.url {
                existing.url = Some(url);
            }
            if let Some(notes) = patch.notes {
                existing.notes = Some(notes);
            }
            if let Some(tags) = patch.tags {
                existing.tags = Some(tags);
            }
            if let Some(kind) = patch.kind {
                existing.kind = Some(kind);
            }
            existing.updated_at = patch.updated_at;
        }
        self.changed(Table::Resources);
        Ok(())
    }

    async fn delete_resource(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        self.resources
            .write()
            .retain(|r| !(r.id == id && r.user_id == owner));
        self.changed(Table::Resources);
        Ok(())
    }

    async fn list_categories(&self, owner: Uuid) -> Result<Vec<CategoryRow>> {
        self.read_guard()?;
        let mut rows: Vec<CategoryRow> = self
            .categories
            .read()
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        // The hosted query orders by the `order` column.
        rows.sort_by_key(|r| r.order);
        Ok(rows)
    }

    async fn insert_category(&self, row: CategoryRow) -> Result<()> {
        self.write_guard()?;
        self.categories.write().push(row);
        self.changed(Table::Categories);
        Ok(())
    }

    async fn update_category(&self, id: Uuid, patch: CategoryPatchRow, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        if let Some(existing) = self
            .categories
            .write()
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
        {
            if let Some(name) = patch.name {
                existing.name = name;
            }
            if let Some(order) = patch.order {
                existing.order = order;
            }
            if let Some(is_active) = patch.is_active {
                existing.is_active = is_active;
            }
        }
        self.changed(Table::Categories);
        Ok(())
    }

    async fn delete_category(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.write_guard()?;
        self.categories
            .write()
            .retain(|r| !(r.id == id && r.user_id == owner));
        self.changed(Table::Categories);
        Ok(())
    }

    fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent> {
        self.channels[&table].subscribe()
    }
}
