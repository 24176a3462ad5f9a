use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated note against a topic. Tags keep their insertion order for
/// display; the optional category label is genuinely optional (no
/// empty-string sentinel).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub content: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewJournal {
    pub topic_id: Uuid,
    pub content: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
}

impl JournalEntry {
    pub fn new(new: NewJournal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            topic_id: new.topic_id,
            content: new.content,
            tags: new.tags,
            category: new.category,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalPatch {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

impl JournalPatch {
    pub fn apply(self, entry: &mut JournalEntry) {
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(tags) = self.tags {
            entry.tags = tags;
        }
        if let Some(category) = self.category {
            entry.category = Some(category);
        }
        entry.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_journal_keeps_tag_order() {
        let entry = JournalEntry::new(NewJournal {
            topic_id: Uuid::new_v4(),
            content: "Learned about hooks today".to_string(),
            tags: vec!["react".into(), "hooks".into(), "frontend".into()],
            category: None,
        });
        assert_eq!(entry.tags, vec!["react", "hooks", "frontend"]);
        assert!(entry.category.is_none());
    }

    #[test]
    fn test_patch_replaces_tags() {
        let mut entry = JournalEntry::new(NewJournal {
            topic_id: Uuid::new_v4(),
            content: "note".to_string(),
            tags: vec!["old".into()],
            category: None,
        });

        JournalPatch {
            tags: Some(vec!["new".into(), "tags".into()]),
            ..Default::default()
        }
        .apply(&mut entry);

        assert_eq!(entry.tags, vec!["new", "tags"]);
        assert_eq!(entry.content, "note");
    }
}
