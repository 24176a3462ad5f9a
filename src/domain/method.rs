use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a topic is being studied (course, book, practice, ...). Owned by
/// exactly one topic and cascade-deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningMethod {
    pub id: Uuid,
    pub topic_id: Uuid,
    /// Free-text label ("Online Course", "Textbook", ...).
    pub kind: String,
    pub title: String,
    pub link: Option<String>,
    /// Hours; never negative.
    pub time_spent: Option<f32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewMethod {
    pub topic_id: Uuid,
    pub kind: String,
    pub title: String,
    pub link: Option<String>,
    pub time_spent: Option<f32>,
}

impl LearningMethod {
    pub fn new(new: NewMethod) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            topic_id: new.topic_id,
            kind: new.kind,
            title: new.title,
            link: new.link,
            time_spent: new.time_spent.map(|h| h.max(0.0)),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodPatch {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub time_spent: Option<f32>,
}

impl MethodPatch {
    pub fn apply(self, method: &mut LearningMethod) {
        if let Some(kind) = self.kind {
            method.kind = kind;
        }
        if let Some(title) = self.title {
            method.title = title;
        }
        if let Some(link) = self.link {
            method.link = Some(link);
        }
        if let Some(time_spent) = self.time_spent {
            method.time_spent = Some(time_spent.max(0.0));
        }
        method.updated_at = Utc::now();
    }
}
