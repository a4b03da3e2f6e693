// Request handlers, split by whether the route sits behind bearer auth
pub mod protected;
pub mod public;
