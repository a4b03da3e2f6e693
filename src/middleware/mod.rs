pub mod auth;
pub mod store;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use store::StoreHandle;
