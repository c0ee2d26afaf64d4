use std::sync::Arc;

use uuid::Uuid;

use crate::context::RequestContext;
use crate::database::{Page, Person, PersonRepository, StorageError};

/// Sits between the handlers and whichever repository was wired at startup.
/// Performs no validation of its own.
#[derive(Clone)]
pub struct PersonService {
    repo: Arc<dyn PersonRepository>,
}

impl PersonService {
    pub fn new(repo: Arc<dyn PersonRepository>) -> Self {
        Self { repo }
    }

    pub fn backend(&self) -> &'static str {
        self.repo.backend()
    }

    pub async fn create_person(&self, ctx: &RequestContext, person: Person) -> Result<(), StorageError> {
        self.repo.create(ctx, person).await
    }

    pub async fn get_all_persons(&self, ctx: &RequestContext, page: Page) -> Result<Vec<Person>, StorageError> {
        self.repo.get_all(ctx, page).await
    }

    pub async fn get_person(&self, ctx: &RequestContext, id: Uuid) -> Result<Person, StorageError> {
        self.repo.get_by_id(ctx, id).await
    }

    pub async fn update_person(&self, ctx: &RequestContext, person: Person) -> Result<(), StorageError> {
        self.repo.update(ctx, person).await
    }

    pub async fn delete_person(&self, ctx: &RequestContext, id: Uuid) -> Result<(), StorageError> {
        self.repo.delete(ctx, id).await
    }

    pub async fn health_check(&self, ctx: &RequestContext) -> Result<(), StorageError> {
        self.repo.health_check(ctx).await
    }
}
