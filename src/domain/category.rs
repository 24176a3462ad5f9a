use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display grouping for topics. `order` is dense and zero-based by
/// construction; the store renumbers after every reorder. Categories do not
/// own topics: a topic merely stores a `category_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub order: i32,
    pub is_active: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            order,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(is_active) = self.is_active {
            category.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_is_active() {
        let category = Category::new("Web Development", 0);
        assert!(category.is_active);
        assert_eq!(category.order, 0);
    }

    #[test]
    fn test_patch() {
        let mut category = Category::new("Design", 2);
        CategoryPatch {
            name: Some("Product Design".to_string()),
            is_active: Some(false),
        }
        .apply(&mut category);
        assert_eq!(category.name, "Product Design");
        assert!(!category.is_active);
        assert_eq!(category.order, 2);
    }
}
