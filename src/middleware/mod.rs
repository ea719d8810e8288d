pub mod auth;
pub mod response;

pub use auth::auth_context_middleware;
pub use response::{ApiResponse, ApiResult};
