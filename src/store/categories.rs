use uuid::Uuid;

use crate::domain::{Category, CategoryPatch, ReorderDirection, Topic};
use crate::error::StoreError;
use crate::remote::{CategoryPatchRow, CategoryRow};
use crate::store::{require_non_empty, Collection, StoreCtx, WriteMode};

/// Category collection plus the sequencing and activation logic layered on
/// top of the generic store pattern.
///
/// Holds a handle to the live topic collection so the delete guard checks
/// referential integrity against what the user is actually looking at.
pub struct CategoryStore {
    items: Collection<Category>,
    topics: Collection<Topic>,
    ctx: StoreCtx,
}

impl CategoryStore {
    pub(crate) fn new(ctx: StoreCtx, topics: Collection<Topic>) -> Self {
        Self {
            items: Collection::default(),
            topics,
            ctx,
        }
    }

    pub fn all(&self) -> Vec<Category> {
        self.items.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Category> {
        self.items.read().iter().find(|c| c.id == id).cloned()
    }

    pub(crate) fn replace(&self, categories: Vec<Category>) {
        *self.items.write() = categories;
    }

    /// Appends at the end of the sequence: order = current count.
    pub async fn add(&self, name: &str) -> Result<Category, StoreError> {
        require_non_empty(&*self.ctx.notifier, "name", name)?;
        let mode = self.ctx.write_mode().await?;

        let category = {
            let mut items = self.items.write();
            let category = Category::new(name, items.len() as i32);
            items.push(category.clone());
            category
        };

        if let WriteMode::Remote(owner) = mode {
            let row = CategoryRow::from_category(&category, owner);
            if let Err(e) = self.ctx.backend.insert_category(row).await {
                self.items.write().retain(|c| c.id != category.id);
                self.ctx
                    .notifier
                    .error("Failed to save category to database");
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Category added successfully");
        Ok(category)
    }

    pub async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, StoreError> {
        let mode = self.ctx.write_mode().await?;

        let updated = {
            let mut items = self.items.write();
            items.iter_mut().find(|c| c.id == id).map(|category| {
                patch.clone().apply(category);
                category.clone()
            })
        };
        let Some(updated) = updated else {
            self.ctx.notifier.error("Category not found");
            return Err(StoreError::NotFound {
                entity: "category",
                id,
            });
        };

        if let WriteMode::Remote(owner) = mode {
            let row = CategoryPatchRow::from_patch(patch);
            if let Err(e) = self.ctx.backend.update_category(id, row, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to update category in database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Category updated successfully");
        Ok(updated)
    }

    /// Rejected while any topic still references the category; the error is
    /// the one failure callers are expected to match on.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mode = self.ctx.write_mode().await?;

        if self.topics.read().iter().any(|t| t.category_id == id) {
            self.ctx
                .notifier
                .error("Cannot delete category with existing topics");
            return Err(StoreError::CategoryNotEmpty { id });
        }

        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|c| c.id != id);
            before != items.len()
        };
        if !removed {
            self.ctx.notifier.error("Category not found");
            return Err(StoreError::NotFound {
                entity: "category",
                id,
            });
        }

        if let WriteMode::Remote(owner) = mode {
            if let Err(e) = self.ctx.backend.delete_category(id, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to delete category from database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        self.ctx.notifier.success("Category deleted successfully");
        Ok(())
    }

    /// Swaps with the adjacent entry and renumbers every order to its new
    /// index. No-op at the boundary. Only the two swapped rows are written
    /// remotely.
    pub async fn reorder(&self, id: Uuid, direction: ReorderDirection) -> Result<(), StoreError> {
        let mode = self.ctx.write_mode().await?;

        let swapped = {
            let mut items = self.items.write();
            let Some(index) = items.iter().position(|c| c.id == id) else {
                drop(items);
                self.ctx.notifier.error("Category not found");
                return Err(StoreError::NotFound {
                    entity: "category",
                    id,
                });
            };
            let at_boundary = match direction {
                ReorderDirection::Up => index == 0,
                ReorderDirection::Down => index + 1 == items.len(),
            };
            if at_boundary {
                None
            } else {
                let neighbor = match direction {
                    ReorderDirection::Up => index - 1,
                    ReorderDirection::Down => index + 1,
                };
                items.swap(index, neighbor);
                for (position, category) in items.iter_mut().enumerate() {
                    category.order = position as i32;
                }
                Some((items[index].clone(), items[neighbor].clone()))
            }
        };
        let Some((first, second)) = swapped else {
            return Ok(());
        };

        if let WriteMode::Remote(owner) = mode {
            let mut failure: Option<anyhow::Error> = None;
            for category in [&first, &second] {
                let row = CategoryPatchRow::order(category.order);
                if let Err(e) = self
                    .ctx
                    .backend
                    .update_category(category.id, row, owner)
                    .await
                {
                    failure.get_or_insert(e);
                }
            }
            if let Some(e) = failure {
                self.ctx
                    .notifier
                    .error("Failed to reorder categories in database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        Ok(())
    }

    /// Flips visibility of the category's topics. Purely cosmetic; nothing
    /// cascades.
    pub async fn toggle_active(&self, id: Uuid) -> Result<bool, StoreError> {
        let mode = self.ctx.write_mode().await?;

        let toggled = {
            let mut items = self.items.write();
            items.iter_mut().find(|c| c.id == id).map(|category| {
                category.is_active = !category.is_active;
                category.clone()
            })
        };
        let Some(toggled) = toggled else {
            self.ctx.notifier.error("Category not found");
            return Err(StoreError::NotFound {
                entity: "category",
                id,
            });
        };

        if let WriteMode::Remote(owner) = mode {
            let row = CategoryPatchRow::active(toggled.is_active);
            if let Err(e) = self.ctx.backend.update_category(id, row, owner).await {
                self.ctx
                    .notifier
                    .error("Failed to update category status in database");
                self.ctx.resync.request();
                return Err(StoreError::Remote(e));
            }
        }

        Ok(toggled.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTopic;
    use crate::remote::RemoteBackend;
    use crate::test_helpers::TestHarness;
    use rstest::rstest;

    fn orders(store: &CategoryStore) -> Vec<i32> {
        store.all().iter().map(|c| c.order).collect()
    }

    fn names(store: &CategoryStore) -> Vec<String> {
        store.all().iter().map(|c| c.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_add_appends_at_end() {
        let h = TestHarness::demo();
        let first = h.stores.categories.add("Web Dev").await.unwrap();
        let second = h.stores.categories.add("Languages").await.unwrap();
        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert!(first.is_active && second.is_active);
    }

    #[tokio::test]
    async fn test_reorder_swaps_and_renumbers() {
        let h = TestHarness::demo();
        h.stores.categories.add("A").await.unwrap();
        let b = h.stores.categories.add("B").await.unwrap();
        h.stores.categories.add("C").await.unwrap();

        h.stores
            .categories
            .reorder(b.id, ReorderDirection::Up)
            .await
            .unwrap();

        assert_eq!(names(&h.stores.categories), vec!["B", "A", "C"]);
        assert_eq!(orders(&h.stores.categories), vec![0, 1, 2]);
    }

    #[rstest]
    #[case::top_up(0, ReorderDirection::Up)]
    #[case::bottom_down(2, ReorderDirection::Down)]
    #[tokio::test]
    async fn test_reorder_boundary_is_noop(
        #[case] index: usize,
        #[case] direction: ReorderDirection,
    ) {
        let h = TestHarness::demo();
        for name in ["A", "B", "C"] {
            h.stores.categories.add(name).await.unwrap();
        }
        let id = h.stores.categories.all()[index].id;

        h.stores.categories.reorder(id, direction).await.unwrap();

        assert_eq!(names(&h.stores.categories), vec!["A", "B", "C"]);
        assert_eq!(orders(&h.stores.categories), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_orders_stay_dense_across_mutations() {
        let h = TestHarness::demo();
        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D"] {
            ids.push(h.stores.categories.add(name).await.unwrap().id);
        }

        h.stores
            .categories
            .reorder(ids[3], ReorderDirection::Up)
            .await
            .unwrap();
        h.stores.categories.delete(ids[1]).await.unwrap();
        h.stores
            .categories
            .reorder(ids[0], ReorderDirection::Down)
            .await
            .unwrap();

        let mut seen = orders(&h.stores.categories);
        seen.sort_unstable();
        let expected: Vec<i32> = (0..h.stores.categories.all().len() as i32).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_reorder_persists_only_swapped_rows() {
        let owner = Uuid::new_v4();
        let h = TestHarness::signed_in(owner);
        for name in ["A", "B", "C"] {
            h.stores.categories.add(name).await.unwrap();
        }
        let c = h.stores.categories.all()[2].clone();

        h.stores
            .categories
            .reorder(c.id, ReorderDirection::Up)
            .await
            .unwrap();

        let rows = h.backend.list_categories(owner).await.unwrap();
        let row_names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(row_names, ["A", "C", "B"]);
        assert_eq!(rows.iter().map(|r| r.order).collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[tokio::test]
    async fn test_delete_guard_rejects_referenced_category() {
        let h = TestHarness::demo();
        let category = h.stores.categories.add("Web Dev").await.unwrap();
        h.stores
            .topics
            .add(NewTopic {
                title: "React".to_string(),
                category_id: category.id,
                ..Default::default()
            })
            .await
            .unwrap();

        let err = h.stores.categories.delete(category.id).await.unwrap_err();
        assert!(err.is_category_not_empty());
        // No mutation happened.
        assert_eq!(h.stores.categories.all().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_succeeds_once_topics_are_gone() {
        let h = TestHarness::demo();
        let category = h.stores.categories.add("Web Dev").await.unwrap();
        let topic = h
            .stores
            .topics
            .add(NewTopic {
                title: "React".to_string(),
                category_id: category.id,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(h.stores.categories.delete(category.id).await.is_err());
        h.stores.topics.delete(topic.id).await.unwrap();
        h.stores.categories.delete(category.id).await.unwrap();
        assert!(h.stores.categories.all().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_active_flips_flag_only() {
        let h = TestHarness::demo();
        let category = h.stores.categories.add("Design").await.unwrap();

        assert!(!h.stores.categories.toggle_active(category.id).await.unwrap());
        assert!(h.stores.categories.toggle_active(category.id).await.unwrap());
        // Order untouched by toggling.
        assert_eq!(h.stores.categories.get(category.id).unwrap().order, 0);
    }
}
