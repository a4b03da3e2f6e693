// handlers/public/token.rs - POST /token handler

use axum::{extract::State, Form, Json};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::IssuedToken;
use crate::error::ApiError;

/// Form-encoded login credentials
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /token - Exchange username and password for a bearer token
///
/// Expected Input (`application/x-www-form-urlencoded`):
/// ```text
/// username=admin&password=...
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "access_token": "eyJhbGciOiJIUzI1NiI...",
///   "token_type": "bearer"
/// }
/// ```
///
/// Unknown users and wrong passwords both get the same 401.
pub async fn token_post(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<IssuedToken>, ApiError> {
    let credentials = state.credentials.clone();
    let username = form.username;
    let password = form.password;

    // Argon2 is deliberately slow; keep it off the async workers
    let (username, verified) = tokio::task::spawn_blocking(move || {
        let verified = credentials.verify(&username, &password);
        (username, verified)
    })
    .await
    .map_err(|e| {
        tracing::error!("Credential check task failed: {}", e);
        ApiError::internal_server_error("Could not verify credentials")
    })?;

    if !verified {
        return Err(ApiError::unauthorized("Incorrect username or password"));
    }

    let issued = state.tokens.issue(&username)?;
    tracing::info!("Issued access token for '{}'", username);

    Ok(Json(issued))
}
