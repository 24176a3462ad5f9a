use tracing::{error, info};

/// Boundary to whatever presents mutation outcomes to the user.
///
/// Every successful mutation and every failure produces exactly one
/// human-readable message through this trait. Presentation (toasts, status
/// bars) lives outside this crate.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default notifier that routes messages into the tracing pipeline.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(target: "learntrack::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "learntrack::notify", "{message}");
    }
}
