pub mod auth_service;
pub mod person_service;

pub use auth_service::{AuthError, AuthService};
pub use person_service::PersonService;
