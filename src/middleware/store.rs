use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::{pool::PoolConnection, Sqlite, SqliteConnection};

use crate::app::AppState;
use crate::database::DatabaseError;
use crate::error::ApiError;

/// Store connection scoped to one request. Acquired when the handler's
/// arguments are extracted and returned to the pool when dropped, on every
/// exit path.
pub struct StoreHandle(PoolConnection<Sqlite>);

impl StoreHandle {
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for StoreHandle {
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let conn = state.pool.acquire().await.map_err(DatabaseError::from)?;
        Ok(StoreHandle(conn))
    }
}
