use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{CredentialStore, TokenError, TokenService};
use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(pool: SqlitePool, credentials: CredentialStore, security: &SecurityConfig) -> Result<Self, TokenError> {
        let credentials = Arc::new(credentials);
        let tokens = Arc::new(TokenService::new(security, credentials.clone())?);

        Ok(Self {
            pool,
            credentials,
            tokens,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Token acquisition
        .route("/token", post(handlers::public::token_post))
        // Bearer-protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/tracts", get(protected::tracts_get))
        .route("/tracts/", get(protected::tracts_get))
        .route("/tracts/:census_tract", get(protected::tract_get))
        .route("/users/me", get(protected::whoami_get))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
