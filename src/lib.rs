pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod sanitize;

pub use app::{app, AppState};

#[cfg(test)]
pub mod testing;
