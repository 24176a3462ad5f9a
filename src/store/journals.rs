use uuid::Uuid;

use crate::domain::{tags, JournalEntry, JournalPatch, NewJournal};
use crate::error::StoreError;
use crate::remote::{JournalPatchRow, JournalRow};
use crate::store::{require_non_empty, Collection, StoreCtx, WriteMode};

pub struct JournalStore {
    items: Collection<JournalEntry>,
    ctx: StoreCtx,
}

impl JournalStore {
    pub(crate) fn new(ctx: StoreCtx) -> Self {
        Self {
            items: Collection::default(),
            ctx,
        }
    }

    pub fn all(&self) -> Vec<JournalEntry> {
        self.items.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<JournalEntry> {
        self.items.read().iter().find(|j| j.id == id).cloned()
    }

    pub(crate) fn replace(&self, journals: Vec<JournalEntry>) {
        *self.items.write() = journals;
    }

    /// Local cascade removal; remote deletes are the topic store's job.
    pub(crate) fn remove_for_topic(&self, topic_id: Uuid) -> Vec<Uuid> {
        let mut items = self.items.write();
        let removed = items
            .iter()
            .filter(|j| j.topic_id == topic_id)
            .map(|j| j.id)
            .collect();
        items.retain(|j| j.topic_id != topic_id);
        removed
    }

    /// Existing-tag suggestions for the entry form, excluding tags already
    /// attached to the entry being edited.
    pub fn tag_suggestions(&self, editing: Option<Uuid>) -> Vec<String> {
        let items = self.items.read();
        let exclude = editing
            .and_then(|id| items.iter().find(|j| j.id == id))
            .map(|j| j.tags.clone())
            .unwrap_or_default();
        tags::suggestions(items.iter().map(|j| j.tags.as_slice()), &exclude)
    }

    pub async fn add(&self, new: NewJournal) -> Result<JournalEntry, StoreError> {
        require_non_empty(&*self.ctx.notifier, "content", &new.content)?;
        let mode = self.ctx.write_mode().await?;

        let entry = JournalEntry::new(new);
        self.items.write().push(entry.clone());

        if let WriteMode::Remote(owner) = mode {
            let row = JournalRow::from_journal(&entry, owner);
            if let Err(e) = self.ctx.backend.insert_journal(row).await {
                self.items.write().retain(|j| j.id != entry.id);
                self.ctx
                    .notifier
                    .error("Failed to save journal entry to database");
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Journal entry added successfully");
        Ok(entry)
    }

    pub async fn update(&self, id: Uuid, patch: JournalPatch) -> Result<JournalEntry, StoreError> {
        let mode = self.ctx.write_mode().await?;

        let updated = {
            let mut items = self.items.write();
            items.iter_mut().find(|j| j.id == id).map(|entry| {
                patch.clone().apply(entry);
                entry.clone()
            })
        };
        let Some(updated) = updated else {
            self.ctx.notifier.error("Journal entry not found");
            return Err(StoreError::NotFound {
                entity: "journal entry",
                id,
            });
        };

        if let WriteMode::Remote(owner) = mode {
            let row = JournalPatchRow::from_patch(patch, updated.updated_at);
            if let Err(e) = self.ctx.backend.update_journal(id, row, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to update journal entry in database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx
            .notifier
            .success("Journal entry updated successfully");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mode = self.ctx.write_mode().await?;

        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|j| j.id != id);
            before != items.len()
        };
        if !removed {
            self.ctx.notifier.error("Journal entry not found");
            return Err(StoreError::NotFound {
                entity: "journal entry",
                id,
            });
        }

        if let WriteMode::Remote(owner) = mode {
            if let Err(e) = self.ctx.backend.delete_journal(id, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to delete journal entry from database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx
            .notifier
            .success("Journal entry deleted successfully");
        Ok(())
    }
}
