//! Resource storage contract.
//!
//! Loading and persisting catalogs is owned by the host. The linter only
//! reads through a [`ResourceStore`]; writing back is left to the caller,
//! who should persist the original resources, not the annotated copy.

use crate::ast::Resource;
use async_trait::async_trait;
use futures::lock::Mutex;
use thiserror::Error;

/// Errors raised by a resource store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error reading or writing resources.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resources could not be decoded or encoded.
    #[error("Invalid resource data: {message}")]
    Format {
        /// Description of the problem.
        message: String,
    },
}

/// Source and sink of the resources of a project.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Reads every resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resources cannot be loaded.
    async fn read_resources(&self) -> Result<Vec<Resource>, StoreError>;

    /// Replaces the stored resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the resources cannot be persisted.
    async fn write_resources(&self, resources: &[Resource]) -> Result<(), StoreError>;
}

/// A store keeping resources in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    resources: Mutex<Vec<Resource>>,
}

impl InMemoryStore {
    /// Creates a store holding `resources`.
    #[must_use]
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources: Mutex::new(resources),
        }
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn read_resources(&self) -> Result<Vec<Resource>, StoreError> {
        Ok(self.resources.lock().await.clone())
    }

    async fn write_resources(&self, resources: &[Resource]) -> Result<(), StoreError> {
        *self.resources.lock().await = resources.to_vec();
        Ok(())
    }
}
