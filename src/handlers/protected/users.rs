use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::AuthUser;

#[derive(Debug, Serialize, Deserialize)]
pub struct WhoAmI {
    pub username: String,
}

/// GET /users/me - the identity the presented token resolves to
pub async fn whoami_get(Extension(user): Extension<AuthUser>) -> Json<WhoAmI> {
    Json(WhoAmI {
        username: user.username,
    })
}
