pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{
    auth_middleware, authenticate, optional_auth_middleware, require_admin, require_member,
    Identity, RequestContext,
};
pub use extract::{ApiPath, JsonBody};
pub use response::{ApiResponse, ApiResult};
