use uuid::Uuid;

use crate::domain::{tags, NewResource, Resource, ResourcePatch};
use crate::error::StoreError;
use crate::remote::{ResourcePatchRow, ResourceRow};
use crate::store::{require_non_empty, Collection, StoreCtx, WriteMode};

pub struct ResourceStore {
    items: Collection<Resource>,
    ctx: StoreCtx,
}

impl ResourceStore {
    pub(crate) fn new(ctx: StoreCtx) -> Self {
        Self {
            items: Collection::default(),
            ctx,
        }
    }

    pub fn all(&self) -> Vec<Resource> {
        self.items.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Resource> {
        self.items.read().iter().find(|r| r.id == id).cloned()
    }

    pub(crate) fn replace(&self, resources: Vec<Resource>) {
        *self.items.write() = resources;
    }

    /// Local cascade removal; remote deletes are the topic store's job.
    pub(crate) fn remove_for_topic(&self, topic_id: Uuid) -> Vec<Uuid> {
        let mut items = self.items.write();
        let removed = items
            .iter()
            .filter(|r| r.topic_id == topic_id)
            .map(|r| r.id)
            .collect();
        items.retain(|r| r.topic_id != topic_id);
        removed
    }

    /// Existing-tag suggestions for the resource form, excluding tags
    /// already attached to the resource being edited.
    pub fn tag_suggestions(&self, editing: Option<Uuid>) -> Vec<String> {
        let items = self.items.read();
        let exclude = editing
            .and_then(|id| items.iter().find(|r| r.id == id))
            .map(|r| r.tags.clone())
            .unwrap_or_default();
        tags::suggestions(items.iter().map(|r| r.tags.as_slice()), &exclude)
    }

    pub async fn add(&self, new: NewResource) -> Result<Resource, StoreError> {
        require_non_empty(&*self.ctx.notifier, "title", &new.title)?;
        let mode = self.ctx.write_mode().await?;

        let resource = Resource::new(new);
        self.items.write().push(resource.clone());

        if let WriteMode::Remote(owner) = mode {
            let row = ResourceRow::from_resource(&resource, owner);
            if let Err(e) = self.ctx.backend.insert_resource(row).await {
                self.items.write().retain(|r| r.id != resource.id);
                self.ctx
                    .notifier
                    .error("Failed to save resource to database");
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Resource added successfully");
        Ok(resource)
    }

    pub async fn update(&self, id: Uuid, patch: ResourcePatch) -> Result<Resource, StoreError> {
        let mode = self.ctx.write_mode().await?;

        let updated = {
            let mut items = self.items.write();
            items.iter_mut().find(|r| r.id == id).map(|resource| {
                patch.clone().apply(resource);
                resource.clone()
            })
        };
        let Some(updated) = updated else {
            self.ctx.notifier.error("Resource not found");
            return Err(StoreError::NotFound {
                entity: "resource",
                id,
            });
        };

        if let WriteMode::Remote(owner) = mode {
            let row = ResourcePatchRow::from_patch(patch, updated.updated_at);
            if let Err(e) = self.ctx.backend.update_resource(id, row, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to update resource in database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Resource updated successfully");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mode = self.ctx.write_mode().await?;

        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|r| r.id != id);
            before != items.len()
        };
        if !removed {
            self.ctx.notifier.error("Resource not found");
            return Err(StoreError::NotFound {
                entity: "resource",
                id,
            });
        }

        if let WriteMode::Remote(owner) = mode {
            if let Err(e) = self.ctx.backend.delete_resource(id, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to delete resource from database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Resource deleted successfully");
        Ok(())
    }
}
