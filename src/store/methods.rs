use uuid::Uuid;

use crate::domain::{LearningMethod, MethodPatch, NewMethod};
use crate::error::StoreError;
use crate::remote::{MethodPatchRow, MethodRow};
use crate::store::{require_non_empty, Collection, StoreCtx, WriteMode};

pub struct MethodStore {
    items: Collection<LearningMethod>,
    ctx: StoreCtx,
}

impl MethodStore {
    pub(crate) fn new(ctx: StoreCtx) -> Self {
        Self {
            items: Collection::default(),
            ctx,
        }
    }

    pub fn all(&self) -> Vec<LearningMethod> {
        self.items.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<LearningMethod> {
        self.items.read().iter().find(|m| m.id == id).cloned()
    }

    pub(crate) fn replace(&self, methods: Vec<LearningMethod>) {
        *self.items.write() = methods;
    }

    /// Local cascade removal; remote deletes are the topic store's job.
    pub(crate) fn remove_for_topic(&self, topic_id: Uuid) -> Vec<Uuid> {
        let mut items = self.items.write();
        let removed = items
            .iter()
            .filter(|m| m.topic_id == topic_id)
            .map(|m| m.id)
            .collect();
        items.retain(|m| m.topic_id != topic_id);
        removed
    }

    pub async fn add(&self, new: NewMethod) -> Result<LearningMethod, StoreError> {
        require_non_empty(&*self.ctx.notifier, "title", &new.title)?;
        let mode = self.ctx.write_mode().await?;

        let method = LearningMethod::new(new);
        self.items.write().push(method.clone());

        if let WriteMode::Remote(owner) = mode {
            let row = MethodRow::from_method(&method, owner);
            if let Err(e) = self.ctx.backend.insert_method(row).await {
                self.items.write().retain(|m| m.id != method.id);
                self.ctx
                    .notifier
                    .error("Failed to save learning method to database");
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Learning method added successfully");
        Ok(method)
    }

    pub async fn update(&self, id: Uuid, patch: MethodPatch) -> Result<LearningMethod, StoreError> {
        let mode = self.ctx.write_mode().await?;

        let updated = {
            let mut items = self.items.write();
            items.iter_mut().find(|m| m.id == id).map(|method| {
                patch.clone().apply(method);
                method.clone()
            })
        };
        let Some(updated) = updated else {
            self.ctx.notifier.error("Learning method not found");
            return Err(StoreError::NotFound {
                entity: "learning method",
                id,
            });
        };

        if let WriteMode::Remote(owner) = mode {
            let row = MethodPatchRow::from_patch(patch, updated.updated_at);
            if let Err(e) = self.ctx.backend.update_method(id, row, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to update learning method in database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx
            .notifier
            .success("Learning method updated successfully");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mode = self.ctx.write_mode().await?;

        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|m| m.id != id);
            before != items.len()
        };
        if !removed {
            self.ctx.notifier.error("Learning method not found");
            return Err(StoreError::NotFound {
                entity: "learning method",
                id,
            });
        }

        if let WriteMode::Remote(owner) = mode {
            if let Err(e) = self.ctx.backend.delete_method(id, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to delete learning method from database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx
            .notifier
            .success("Learning method deleted successfully");
        Ok(())
    }
}
