use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::database::models::Person;

/// Errors returned by every `PersonRepository` implementation
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("person {0} already exists")]
    AlreadyExists(Uuid),

    #[error("person {0} not found")]
    NotFound(Uuid),

    #[error("failed to {op}: hobbies serialization: {source}")]
    Serialization {
        op: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{op} aborted: request deadline exceeded")]
    DeadlineExceeded { op: &'static str },
}

/// Pagination window for `get_all`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

/// CRUD persistence for `Person`. Both backends return newest-first pages and
/// hand out owned copies only.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    async fn create(&self, ctx: &RequestContext, person: Person) -> Result<(), StorageError>;

    async fn get_all(&self, ctx: &RequestContext, page: Page) -> Result<Vec<Person>, StorageError>;

    async fn update(&self, ctx: &RequestContext, person: Person) -> Result<(), StorageError>;

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), StorageError>;

    async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Person, StorageError>;

    async fn health_check(&self, _ctx: &RequestContext) -> Result<(), StorageError> {
        Ok(())
    }
}
