pub mod dto;

pub use dto::{decode_body, CreatedPerson, ListQuery, LoginRequest, LoginResponse, PersonRequest, PersonView, WhoAmI};
