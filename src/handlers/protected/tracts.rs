use axum::{extract::Path, Extension, Json};

use crate::database::{CensusTract, TractRepository};
use crate::error::ApiError;
use crate::middleware::{AuthUser, StoreHandle};

/// GET /tracts/ - every stored tract, identifiers re-sanitized
pub async fn tracts_get(
    Extension(user): Extension<AuthUser>,
    mut store: StoreHandle,
) -> Result<Json<Vec<CensusTract>>, ApiError> {
    let tracts = TractRepository::new(store.conn()).select_all().await?;
    tracing::debug!("Listing {} tracts for '{}'", tracts.len(), user.username);

    let tracts = tracts
        .into_iter()
        .map(publishable)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(tracts))
}

/// GET /tracts/:census_tract - exact identifier lookup
pub async fn tract_get(
    Extension(user): Extension<AuthUser>,
    Path(census_tract): Path<String>,
    mut store: StoreHandle,
) -> Result<Json<CensusTract>, ApiError> {
    tracing::debug!("Fetching tract {:?} for '{}'", census_tract, user.username);

    let tract = TractRepository::new(store.conn())
        .select_404(&census_tract)
        .await?;

    Ok(Json(publishable(tract)?))
}

/// Clean the identifier and enforce the response constraints. A stored row
/// that breaks them is a server-side data problem, not the caller's.
fn publishable(tract: CensusTract) -> Result<CensusTract, ApiError> {
    let tract = tract.sanitized();
    tract.check_publishable().map_err(|reason| {
        tracing::error!("Refusing to serve stored tract: {}", reason);
        ApiError::internal_server_error("Stored record failed response validation")
    })?;
    Ok(tract)
}
