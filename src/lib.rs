pub mod auth;
pub mod context;
pub mod domain;
pub mod error;
pub mod notify;
pub mod remote;
pub mod seed;
pub mod store;
pub mod sync;

// Make test_helpers available for integration tests
pub mod test_helpers;
