//! Seed dataset used for demo mode, the logged-out preview, and as
//! onboarding fallback for fresh accounts.
//!
//! Injected into the sync coordinator at construction; nothing in the crate
//! holds seed state at module level, so two contexts never share it.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{
    Category, JournalEntry, LearningMethod, Resource, Topic, TopicStatus,
};

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub topics: Vec<Topic>,
    pub methods: Vec<LearningMethod>,
    pub journals: Vec<JournalEntry>,
    pub resources: Vec<Resource>,
    pub categories: Vec<Category>,
}

impl SeedData {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock demo dataset: three categories, three topics at different
    /// stages, and a few methods, journal entries, and resources hanging off
    /// them. Ids are freshly generated per call; cross-references stay
    /// consistent within one dataset.
    pub fn demo() -> Self {
        let web_dev = Category::new("Web Development", 0);
        let languages = Category::new("Languages", 1);
        let design = Category::new("Design", 2);

        let react = Topic {
            id: Uuid::new_v4(),
            title: "React Fundamentals".to_string(),
            description: "Learning React basics, components, state management, and hooks"
                .to_string(),
            category_id: web_dev.id,
            status: TopicStatus::InProgress,
            progress: 60,
            start_date: date(2024, 3, 1),
            target_end_date: date(2024, 5, 1),
            parent_id: None,
            created_at: stamp(2024, 3, 1, 10, 0),
            updated_at: stamp(2024, 3, 15, 14, 30),
        };
        let japanese = Topic {
            id: Uuid::new_v4(),
            title: "Japanese N5 Level".to_string(),
            description:
                "Basic Japanese language skills including hiragana, katakana, and basic kanji"
                    .to_string(),
            category_id: languages.id,
            status: TopicStatus::NotStarted,
            progress: 0,
            start_date: date(2024, 4, 1),
            target_end_date: date(2024, 8, 1),
            parent_id: None,
            created_at: stamp(2024, 3, 20, 9, 0),
            updated_at: stamp(2024, 3, 20, 9, 0),
        };
        let ui_ux = Topic {
            id: Uuid::new_v4(),
            title: "UI/UX Principles".to_string(),
            description:
                "Learning user interface design principles and user experience best practices"
                    .to_string(),
            category_id: design.id,
            status: TopicStatus::Completed,
            progress: 100,
            start_date: date(2024, 2, 1),
            target_end_date: date(2024, 3, 15),
            parent_id: None,
            created_at: stamp(2024, 2, 1, 8, 0),
            updated_at: stamp(2024, 3, 15, 16, 45),
        };

        let methods = vec![
            LearningMethod {
                id: Uuid::new_v4(),
                topic_id: react.id,
                kind: "Online Course".to_string(),
                title: "React Complete Guide".to_string(),
                link: Some("https://react-course.example.com".to_string()),
                time_spent: Some(480.0),
                created_at: stamp(2024, 3, 1, 10, 30),
                updated_at: stamp(2024, 3, 15, 11, 20),
            },
            LearningMethod {
                id: Uuid::new_v4(),
                topic_id: japanese.id,
                kind: "Textbook".to_string(),
                title: "Genki I Textbook".to_string(),
                link: None,
                time_spent: Some(120.0),
                created_at: stamp(2024, 3, 20, 9, 15),
                updated_at: stamp(2024, 3, 20, 9, 15),
            },
        ];

        let journals = vec![
            JournalEntry {
                id: Uuid::new_v4(),
                topic_id: react.id,
                content: "Learned about React hooks today. useState and useEffect are powerful \
                          tools for managing component state and side effects."
                    .to_string(),
                tags: vec!["react".into(), "hooks".into(), "frontend".into()],
                category: Some("Progress Update".to_string()),
                created_at: stamp(2024, 3, 10, 15, 20),
                updated_at: stamp(2024, 3, 10, 15, 20),
            },
            JournalEntry {
                id: Uuid::new_v4(),
                topic_id: ui_ux.id,
                content: "Completed the UI/UX course! Key takeaways: Always design with user \
                          needs in mind, test early and often, and iterate based on feedback."
                    .to_string(),
                tags: vec!["design".into(), "ux".into(), "completion".into()],
                category: Some("Reflection".to_string()),
                created_at: stamp(2024, 3, 15, 16, 45),
                updated_at: stamp(2024, 3, 15, 16, 45),
            },
        ];

        let resources = vec![
            Resource {
                id: Uuid::new_v4(),
                topic_id: react.id,
                title: "React Official Documentation".to_string(),
                url: Some("https://react.dev".to_string()),
                notes: Some("Comprehensive guide to React concepts and APIs".to_string()),
                tags: Vec::new(),
                kind: Some("Documentation".to_string()),
                created_at: stamp(2024, 3, 1, 11, 0),
                updated_at: stamp(2024, 3, 1, 11, 0),
            },
            Resource {
                id: Uuid::new_v4(),
                topic_id: japanese.id,
                title: "Japanese Learning Sheet".to_string(),
                url: None,
                notes: Some("Hiragana and Katakana practice sheets with common phrases".to_string()),
                tags: Vec::new(),
                kind: Some("Study Material".to_string()),
                created_at: stamp(2024, 3, 20, 9, 30),
                updated_at: stamp(2024, 3, 20, 9, 30),
            },
            Resource {
                id: Uuid::new_v4(),
                topic_id: ui_ux.id,
                title: "UI Design Principles Guide".to_string(),
                url: Some("https://example.com/ui-principles".to_string()),
                notes: Some("Comprehensive overview of fundamental UI design principles".to_string()),
                tags: Vec::new(),
                kind: Some("Article".to_string()),
                created_at: stamp(2024, 2, 5, 13, 20),
                updated_at: stamp(2024, 2, 5, 13, 20),
            },
        ];

        Self {
            topics: vec![react, japanese, ui_ux],
            methods,
            journals,
            resources,
            categories: vec![web_dev, languages, design],
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn stamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_references_are_consistent() {
        let seed = SeedData::demo();
        for topic in &seed.topics {
            assert!(seed.categories.iter().any(|c| c.id == topic.category_id));
        }
        for method in &seed.methods {
            assert!(seed.topics.iter().any(|t| t.id == method.topic_id));
        }
        for journal in &seed.journals {
            assert!(seed.topics.iter().any(|t| t.id == journal.topic_id));
        }
        for resource in &seed.resources {
            assert!(seed.topics.iter().any(|t| t.id == resource.topic_id));
        }
    }

    #[test]
    fn test_demo_category_orders_are_dense() {
        let seed = SeedData::demo();
        let mut orders: Vec<i32> = seed.categories.iter().map(|c| c.order).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_datasets_do_not_share_ids() {
        let a = SeedData::demo();
        let b = SeedData::demo();
        assert_ne!(a.topics[0].id, b.topics[0].id);
    }
}
