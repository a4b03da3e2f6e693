// handlers/public/mod.rs - Handlers that do not require a bearer token
pub mod system; // GET /, GET /health
pub mod token; // POST /token - exchange credentials for a bearer token

pub use system::{health, root};
pub use token::token_post;
