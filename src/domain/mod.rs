pub mod category;
pub mod journal;
pub mod method;
pub mod resource;
pub mod tags;
pub mod topic;

pub use category::{Category, CategoryPatch, ReorderDirection};
pub use journal::{JournalEntry, JournalPatch, NewJournal};
pub use method::{LearningMethod, MethodPatch, NewMethod};
pub use resource::{NewResource, Resource, ResourcePatch};
pub use topic::{NewTopic, Topic, TopicPatch, TopicStatus};
