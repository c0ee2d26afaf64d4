pub mod auth;
pub mod preflight;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthSubject};
pub use preflight::options_short_circuit;
pub use response::{ApiResponse, ApiResult};
