// handlers/person/mod.rs - Person CRUD handlers under /api/v1/person
//
// Every handler decodes and validates its input, calls PersonService and
// wraps the result in the success envelope. Storage failures are logged by
// the ApiError conversion and reach the client as a generic message.

use uuid::Uuid;

use crate::error::ApiError;

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use create::person_create;
pub use delete::person_delete;
pub use get::person_get;
pub use list::person_list;
pub use update::person_update;

/// Parse the `:id` path segment
pub(crate) fn parse_person_id(raw: &str) -> Result<Uuid, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::invalid_input("Invalid request"));
    }
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_input("Invalid person id"))
}
