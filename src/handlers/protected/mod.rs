// handlers/protected/mod.rs - Handlers behind jwt_auth_middleware
pub mod tracts; // GET /tracts/, GET /tracts/:census_tract
pub mod users; // GET /users/me

pub use tracts::{tract_get, tracts_get};
pub use users::whoami_get;
