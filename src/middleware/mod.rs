pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{AuthUser, MaybeAuthUser};
pub use extract::{IdPath, JsonBody, OptionalJsonBody, TextPath, ValidQuery};
pub use response::{ApiResponse, ApiResult};
