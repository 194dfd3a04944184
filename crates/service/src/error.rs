//! Error types for the service crate.

use data_loader::DataLoadError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The session has no signed-in user
    #[error("Not signed in (redirect to {redirect})")]
    NotAuthenticated { redirect: String },

    /// Loading, saving or validating the store failed
    #[error("Store error: {0}")]
    Store(#[from] DataLoadError),

    /// A blocking task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] JoinError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
