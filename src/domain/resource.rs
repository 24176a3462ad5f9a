use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference material attached to a topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    /// Free-text label ("Documentation", "Article", ...); optional.
    pub kind: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewResource {
    pub topic_id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub kind: Option<String>,
}

impl Resource {
    pub fn new(new: NewResource) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            topic_id: new.topic_id,
            title: new.title,
            url: new.url,
            notes: new.notes,
            tags: new.tags,
            kind: new.kind,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub kind: Option<String>,
}

impl ResourcePatch {
    pub fn apply(self, resource: &mut Resource) {
        if let Some(title) = self.title {
            resource.title = title;
        }
        if let Some(url) = self.url {
            resource.url = Some(url);
        }
        if let Some(notes) = self.notes {
            resource.notes = Some(notes);
        }
        if let Some(tags) = self.tags {
            resource.tags = tags;
        }
        if let Some(kind) = self.kind {
            resource.kind = Some(kind);
        }
        resource.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resource_optional_fields() {
        let resource = Resource::new(NewResource {
            topic_id: Uuid::new_v4(),
            title: "React Official Documentation".to_string(),
            url: Some("https://react.dev".to_string()),
            ..Default::default()
        });
        assert!(resource.notes.is_none());
        assert!(resource.kind.is_none());
        assert!(resource.tags.is_empty());
    }

    #[test]
    fn test_patch_updates_fields() {
        let mut resource = Resource::new(NewResource {
            topic_id: Uuid::new_v4(),
            title: "Docs".to_string(),
            ..Default::default()
        });

        ResourcePatch {
            notes: Some("Comprehensive guide".to_string()),
            kind: Some("Documentation".to_string()),
            ..Default::default()
        }
        .apply(&mut resource);

        assert_eq!(resource.notes.as_deref(), Some("Comprehensive guide"));
        assert_eq!(resource.kind.as_deref(), Some("Documentation"));
        assert_eq!(resource.title, "Docs");
    }
}
