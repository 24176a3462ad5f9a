use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TopicStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicStatus::NotStarted => write!(f, "Not Started"),
            TopicStatus::InProgress => write!(f, "In Progress"),
            TopicStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// A subject being learned. Categories are referenced by id only; the
/// name-based matching from early schema iterations is gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub status: TopicStatus,
    pub progress: u8,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    /// Present in the schema for sub-topics; unused by the current UI.
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new topic; id and timestamps are stamped by
/// the store at creation time.
#[derive(Debug, Clone, Default)]
pub struct NewTopic {
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub status: Option<TopicStatus>,
    pub progress: u8,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    pub parent_id: Option<Uuid>,
}

impl Topic {
    pub fn new(new: NewTopic) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            category_id: new.category_id,
            status: new.status.unwrap_or(TopicStatus::NotStarted),
            progress: new.progress.min(MAX_PROGRESS),
            start_date: new.start_date,
            target_end_date: new.target_end_date,
            parent_id: new.parent_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: Option<TopicStatus>,
    pub progress: Option<u8>,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    pub parent_id: Option<Uuid>,
}

impl TopicPatch {
    /// Merges into `topic` and bumps `updated_at`. Progress is clamped to
    /// 0..=100 so an out-of-range value can never land in the collection.
    pub fn apply(self, topic: &mut Topic) {
        if let Some(title) = self.title {
            topic.title = title;
        }
        if let Some(description) = self.description {
            topic.description = description;
        }
        if let Some(category_id) = self.category_id {
            topic.category_id = category_id;
        }
        if let Some(status) = self.status {
            topic.status = status;
        }
        if let Some(progress) = self.progress {
            topic.progress = progress.min(MAX_PROGRESS);
        }
        if let Some(start_date) = self.start_date {
            topic.start_date = Some(start_date);
        }
        if let Some(target_end_date) = self.target_end_date {
            topic.target_end_date = Some(target_end_date);
        }
        if let Some(parent_id) = self.parent_id {
            topic.parent_id = Some(parent_id);
        }
        topic.updated_at = Utc::now();
    }

    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn category(category_id: Uuid) -> Self {
        Self {
            category_id: Some(category_id),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_topic(title: &str) -> Topic {
        Topic::new(NewTopic {
            title: title.to_string(),
            category_id: Uuid::new_v4(),
            ..Default::default()
        })
    }

    #[test]
    fn test_new_topic_defaults() {
        let topic = new_topic("React Fundamentals");
        assert_eq!(topic.title, "React Fundamentals");
        assert_eq!(topic.status, TopicStatus::NotStarted);
        assert_eq!(topic.progress, 0);
        assert!(topic.start_date.is_none());
        assert_eq!(topic.created_at, topic.updated_at);
    }

    #[test]
    fn test_patch_merges_and_bumps_updated_at() {
        let mut topic = new_topic("React");
        let created = topic.created_at;

        TopicPatch {
            status: Some(TopicStatus::InProgress),
            progress: Some(60),
            ..Default::default()
        }
        .apply(&mut topic);

        assert_eq!(topic.status, TopicStatus::InProgress);
        assert_eq!(topic.progress, 60);
        assert_eq!(topic.title, "React");
        assert_eq!(topic.created_at, created);
        assert!(topic.updated_at >= created);
    }

    #[test]
    fn test_patch_clamps_progress() {
        let mut topic = new_topic("React");
        TopicPatch::progress(150).apply(&mut topic);
        assert_eq!(topic.progress, 100);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TopicStatus::NotStarted).unwrap(),
            "\"Not Started\""
        );
        assert_eq!(
            serde_json::to_string(&TopicStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::to_string(&TopicStatus::Completed).unwrap(),
            "\"Completed\""
        );
        let parsed: TopicStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, TopicStatus::InProgress);
    }
}
