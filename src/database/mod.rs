pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, close_pool, connect_pool};
pub use memory::InMemoryPersonRepository;
pub use models::Person;
pub use postgres::PostgresPersonRepository;
pub use repository::{Page, PersonRepository, StorageError};
