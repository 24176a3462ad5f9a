//! Wire representation of the remote tables.
//!
//! Row field names match the remote schema exactly (`start_date`,
//! `parent_id`, `user_id`, ...); the conversions below are the only place
//! entity fields and row columns meet, so the mapping cannot silently drift
//! per call site.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::topic::MAX_PROGRESS;
use crate::domain::{
    Category, CategoryPatch, JournalEntry, JournalPatch, LearningMethod, MethodPatch, Resource,
    ResourcePatch, Topic, TopicPatch, TopicStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Uuid,
    pub status: TopicStatus,
    pub progress: u8,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    pub parent_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TopicRow {
    pub fn from_topic(topic: &Topic, owner: Uuid) -> Self {
        Self {
            id: topic.id,
            title: topic.title.clone(),
            description: Some(topic.description.clone()),
            category: topic.category_id,
            status: topic.status,
            progress: topic.progress,
            start_date: topic.start_date,
            target_end_date: topic.target_end_date,
            parent_id: topic.parent_id,
            user_id: owner,
            created_at: topic.created_at,
            updated_at: topic.updated_at,
        }
    }

    pub fn into_topic(self) -> Topic {
        Topic {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            category_id: self.category,
            status: self.status,
            progress: self.progress,
            start_date: self.start_date,
            target_end_date: self.target_end_date,
            parent_id: self.parent_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Update payload for the topics table. Absent columns are not sent, so a
/// concurrent partial update to other columns is not clobbered.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopicPatchRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TopicStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl TopicPatchRow {
    pub fn from_patch(patch: TopicPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            category: patch.category_id,
            status: patch.status,
            progress: patch.progress.map(|p| p.min(MAX_PROGRESS)),
            start_date: patch.start_date,
            target_end_date: patch.target_end_date,
            parent_id: patch.parent_id,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodRow {
    pub id: Uuid,
    pub topic_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub link: Option<String>,
    pub time_spent: Option<f32>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MethodRow {
    pub fn from_method(method: &LearningMethod, owner: Uuid) -> Self {
        Self {
            id: method.id,
            topic_id: method.topic_id,
            kind: method.kind.clone(),
            title: method.title.clone(),
            link: method.link.clone(),
            time_spent: method.time_spent,
            user_id: owner,
            created_at: method.created_at,
            updated_at: method.updated_at,
        }
    }

    pub fn into_method(self) -> LearningMethod {
        LearningMethod {
            id: self.id,
            topic_id: self.topic_id,
            kind: self.kind,
            title: self.title,
            link: self.link,
            time_spent: self.time_spent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MethodPatchRow {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<f32>,
    pub updated_at: DateTime<Utc>,
}

impl MethodPatchRow {
    pub fn from_patch(patch: MethodPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            kind: patch.kind,
            title: patch.title,
            link: patch.link,
            time_spent: patch.time_spent.map(|h| h.max(0.0)),
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalRow {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalRow {
    pub fn from_journal(entry: &JournalEntry, owner: Uuid) -> Self {
        Self {
            id: entry.id,
            topic_id: entry.topic_id,
            content: entry.content.clone(),
            tags: Some(entry.tags.clone()),
            category: entry.category.clone(),
            user_id: owner,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }

    pub fn into_journal(self) -> JournalEntry {
        JournalEntry {
            id: self.id,
            topic_id: self.topic_id,
            content: self.content,
            tags: self.tags.unwrap_or_default(),
            category: self.category,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JournalPatchRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JournalPatchRow {
    pub fn from_patch(patch: JournalPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            content: patch.content,
            tags: patch.tags,
            category: patch.category,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceRow {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceRow {
    pub fn from_resource(resource: &Resource, owner: Uuid) -> Self {
        Self {
            id: resource.id,
            topic_id: resource.topic_id,
            title: resource.title.clone(),
            url: resource.url.clone(),
            notes: resource.notes.clone(),
            tags: Some(resource.tags.clone()),
            kind: resource.kind.clone(),
            user_id: owner,
            created_at: resource.created_at,
            updated_at: resource.updated_at,
        }
    }

    pub fn into_resource(self) -> Resource {
        Resource {
            id: self.id,
            topic_id: self.topic_id,
            title: self.title,
            url: self.url,
            notes: self.notes,
            tags: self.tags.unwrap_or_default(),
            kind: self.kind,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourcePatchRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ResourcePatchRow {
    pub fn from_patch(patch: ResourcePatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            title: patch.title,
            url: patch.url,
            notes: patch.notes,
            tags: patch.tags,
            kind: patch.kind,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub order: i32,
    pub is_active: bool,
    pub user_id: Uuid,
}

impl CategoryRow {
    pub fn from_category(category: &Category, owner: Uuid) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            order: category.order,
            is_active: category.is_active,
            user_id: owner,
        }
    }

    pub fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            order: self.order,
            is_active: self.is_active,
        }
    }
}

/// Update payload for the categories table. The table carries no
/// timestamps.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CategoryPatchRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl CategoryPatchRow {
    pub fn from_patch(patch: CategoryPatch) -> Self {
        Self {
            name: patch.name,
            order: None,
            is_active: patch.is_active,
        }
    }

    pub fn order(order: i32) -> Self {
        Self {
            order: Some(order),
            ..Default::default()
        }
    }

    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewJournal, NewTopic};

    #[test]
    fn test_topic_row_wire_names() {
        let topic = Topic::new(NewTopic {
            title: "React".to_string(),
            category_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        });
        let owner = Uuid::new_v4();
        let value = serde_json::to_value(TopicRow::from_topic(&topic, owner)).unwrap();

        assert_eq!(value["start_date"], "2024-03-01");
        assert_eq!(value["status"], "Not Started");
        assert_eq!(value["user_id"], owner.to_string());
        assert!(value["target_end_date"].is_null());
        assert!(value.get("startDate").is_none());
    }

    #[test]
    fn test_topic_round_trip() {
        let topic = Topic::new(NewTopic {
            title: "React".to_string(),
            description: "Components and hooks".to_string(),
            category_id: Uuid::new_v4(),
            progress: 60,
            status: Some(TopicStatus::InProgress),
            ..Default::default()
        });
        let row = TopicRow::from_topic(&topic, Uuid::new_v4());
        assert_eq!(row.into_topic(), topic);
    }

    #[test]
    fn test_null_description_maps_to_empty_string() {
        let topic = Topic::new(NewTopic {
            title: "Bare".to_string(),
            category_id: Uuid::new_v4(),
            ..Default::default()
        });
        let mut row = TopicRow::from_topic(&topic, Uuid::new_v4());
        row.description = None;
        assert_eq!(row.into_topic().description, "");
    }

    #[test]
    fn test_method_row_uses_type_column() {
        let row = MethodRow {
            id: Uuid::new_v4(),
            topic_id: Uuid::new_v4(),
            kind: "Textbook".to_string(),
            title: "Genki I".to_string(),
            link: None,
            time_spent: Some(2.0),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["type"], "Textbook");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_topic_patch_row_omits_absent_columns() {
        let row = TopicPatchRow::from_patch(TopicPatch::progress(40), Utc::now());
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["progress"], 40);
        assert!(value.get("title").is_none());
        assert!(value.get("category").is_none());
        assert!(value.get("status").is_none());
        assert!(value.get("updated_at").is_some());
    }

    #[test]
    fn test_topic_patch_row_clamps_progress() {
        let row = TopicPatchRow::from_patch(TopicPatch::progress(150), Utc::now());
        assert_eq!(row.progress, Some(100));
    }

    #[test]
    fn test_category_patch_row_order_only() {
        let value = serde_json::to_value(CategoryPatchRow::order(2)).unwrap();
        assert_eq!(value["order"], 2);
        assert!(value.get("name").is_none());
        assert!(value.get("is_active").is_none());
    }

    #[test]
    fn test_null_tags_map_to_empty_vec() {
        let entry = JournalEntry::new(NewJournal {
            topic_id: Uuid::new_v4(),
            content: "note".to_string(),
            ..Default::default()
        });
        let mut row = JournalRow::from_journal(&entry, Uuid::new_v4());
        row.tags = None;
        assert!(row.into_journal().tags.is_empty());
    }
}
