use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewTopic, Topic, TopicPatch};
use crate::error::StoreError;
use crate::remote::{TopicPatchRow, TopicRow};
use crate::store::{
    require_non_empty, Collection, JournalStore, MethodStore, ResourceStore, StoreCtx, WriteMode,
};

/// Topic collection with optimistic mutations. Deleting a topic cascades to
/// its methods, journal entries, and resources in the same tick, before any
/// remote delete is issued.
pub struct TopicStore {
    items: Collection<Topic>,
    methods: Arc<MethodStore>,
    journals: Arc<JournalStore>,
    resources: Arc<ResourceStore>,
    ctx: StoreCtx,
}

impl TopicStore {
    pub(crate) fn new(
        ctx: StoreCtx,
        methods: Arc<MethodStore>,
        journals: Arc<JournalStore>,
        resources: Arc<ResourceStore>,
    ) -> Self {
        Self {
            items: Collection::default(),
            methods,
            journals,
            resources,
            ctx,
        }
    }

    pub fn all(&self) -> Vec<Topic> {
        self.items.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Topic> {
        self.items.read().iter().find(|t| t.id == id).cloned()
    }

    pub(crate) fn collection(&self) -> Collection<Topic> {
        Arc::clone(&self.items)
    }

    pub(crate) fn replace(&self, topics: Vec<Topic>) {
        *self.items.write() = topics;
    }

    pub async fn add(&self, new: NewTopic) -> Result<Topic, StoreError> {
        require_non_empty(&*self.ctx.notifier, "title", &new.title)?;
        let mode = self.ctx.write_mode().await?;

        let topic = Topic::new(new);
        self.items.write().push(topic.clone());

        if let WriteMode::Remote(owner) = mode {
            let row = TopicRow::from_topic(&topic, owner);
            if let Err(e) = self.ctx.backend.insert_topic(row).await {
                // Roll the optimistic append back; the caller still holds nothing.
                self.items.write().retain(|t| t.id != topic.id);
                self.ctx.notifier.error("Failed to save topic to database");
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Topic added successfully");
        Ok(topic)
    }

    pub async fn update(&self, id: Uuid, patch: TopicPatch) -> Result<Topic, StoreError> {
        let mode = self.ctx.write_mode().await?;

        let updated = {
            let mut items = self.items.write();
            items.iter_mut().find(|t| t.id == id).map(|topic| {
                patch.clone().apply(topic);
                topic.clone()
            })
        };
        let Some(updated) = updated else {
            self.ctx.notifier.error("Topic not found");
            return Err(StoreError::NotFound { entity: "topic", id });
        };

        if let WriteMode::Remote(owner) = mode {
            // Only the patched columns go over the wire; a concurrent update
            // to other columns is left alone.
            let row = TopicPatchRow::from_patch(patch, updated.updated_at);
            if let Err(e) = self.ctx.backend.update_topic(id, row, owner).await {
                // No field-level snapshot to restore; resynchronize instead.
                self.ctx.notifier.error("Failed to update topic in database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Topic updated successfully");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mode = self.ctx.write_mode().await?;

        // Cascade in-memory first so consumers see the whole subtree
        // disappear at once, even if the remote deletes lag.
        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|t| t.id != id);
            before != items.len()
        };
        if !removed {
            self.ctx.notifier.error("Topic not found");
            return Err(StoreError::NotFound { entity: "topic", id });
        }
        let method_ids = self.methods.remove_for_topic(id);
        let journal_ids = self.journals.remove_for_topic(id);
        let resource_ids = self.resources.remove_for_topic(id);

        if let WriteMode::Remote(owner) = mode {
            let mut failure: Option<anyhow::Error> = None;
            if let Err(e) = self.ctx.backend.delete_topic(id, owner).await {
                failure = Some(e);
            }
            // Child deletes are issued independently; they are not atomic
            // with the parent's.
            for method_id in method_ids {
                if let Err(e) = self.ctx.backend.delete_method(method_id, owner).await {
                    failure.get_or_insert(e);
                }
            }
            for journal_id in journal_ids {
                if let Err(e) = self.ctx.backend.delete_journal(journal_id, owner).await {
                    failure.get_or_insert(e);
                }
            }
            for resource_id in resource_ids {
                if let Err(e) = self.ctx.backend.delete_resource(resource_id, owner).await {
                    failure.get_or_insert(e);
                }
            }
            if let Some(e) = failure {
                self.ctx
                    .notifier
                    .error("Failed to delete topic from database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Topic deleted successfully");
        Ok(())
    }
}
