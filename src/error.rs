use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by the entity stores.
///
/// Everything except `CategoryNotEmpty` is absorbed at the store boundary
/// and reported through the [`Notifier`](crate::notify::Notifier); callers
/// that want to react to a specific failure can still match on the returned
/// variant. `CategoryNotEmpty` is the one error presentation code is
/// expected to special-case (e.g. keep a confirmation dialog open).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("you need to be signed in to save data")]
    SignedOut,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("cannot delete category with existing topics")]
    CategoryNotEmpty { id: Uuid },

    #[error("remote persistence failed")]
    Remote(#[source] anyhow::Error),
}

impl StoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_category_not_empty(&self) -> bool {
        matches!(self, Self::CategoryNotEmpty { .. })
    }
}
