use anyhow::Result;
use std::sync::Arc;

use learntrack::auth::AuthState;
use learntrack::context::LearningContext;
use learntrack::notify::LogNotifier;
use learntrack::remote::MemoryBackend;
use learntrack::seed::SeedData;

/// Builds a demo-mode context and prints what a consumer would render.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let auth = Arc::new(AuthState::demo());
    let backend = Arc::new(MemoryBackend::new());
    let context =
        LearningContext::new(backend, auth, SeedData::demo(), Arc::new(LogNotifier)).await;

    for category in context.categories.all() {
        println!("[{}] {}", category.order, category.name);
        for topic in context
            .topics
            .all()
            .iter()
            .filter(|t| t.category_id == category.id)
        {
            println!("  - {} ({}, {}%)", topic.title, topic.status, topic.progress);
        }
    }

    let counts = context.topic_status_counts();
    println!(
        "{} topics: {} not started, {} in progress, {} completed",
        counts.total, counts.not_started, counts.in_progress, counts.completed
    );

    context.shutdown();
    Ok(())
}
