use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::database::models::Person;
use crate::database::repository::{Page, PersonRepository, StorageError};

struct Entry {
    seq: u64,
    person: Person,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    persons: HashMap<Uuid, Entry>,
}

/// Transient store for tests and local development. Writers take the
/// exclusive lock, readers share it. Ignores request deadlines.
#[derive(Default)]
pub struct InMemoryPersonRepository {
    inner: RwLock<Inner>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.persons.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _ctx: &RequestContext, person: Person) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;

        if inner.persons.contains_key(&person.id) {
            return Err(StorageError::AlreadyExists(person.id));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.persons.insert(person.id, Entry { seq, person });
        Ok(())
    }

    async fn get_all(&self, _ctx: &RequestContext, page: Page) -> Result<Vec<Person>, StorageError> {
        let inner = self.inner.read().await;

        // Newest first, same as the relational backend's created_at DESC
        let mut entries: Vec<&Entry> = inner.persons.values().collect();
        entries.sort_unstable_by(|a, b| b.seq.cmp(&a.seq));

        Ok(entries
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|entry| entry.person.clone())
            .collect())
    }

    async fn update(&self, _ctx: &RequestContext, person: Person) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;

        match inner.persons.get_mut(&person.id) {
            Some(entry) => {
                entry.person = person;
                Ok(())
            }
            None => Err(StorageError::NotFound(person.id)),
        }
    }

    async fn delete(&self, _ctx: &RequestContext, id: Uuid) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;

        inner
            .persons
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound(id))
    }

    async fn get_by_id(&self, _ctx: &RequestContext, id: Uuid) -> Result<Person, StorageError> {
        let inner = self.inner.read().await;

        inner
            .persons
            .get(&id)
            .map(|entry| entry.person.clone())
            .ok_or(StorageError::NotFound(id))
    }
}
