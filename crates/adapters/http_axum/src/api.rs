//! JSON handlers for the entity boundaries.

use axum::Json;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;

use heliohub_app::entities::EntityView;
use heliohub_app::ports::DeviceClient;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: DeviceClient + 'static,
{
    Router::new()
        .route("/entities", get(list::<C>))
        .route("/entities/{key}", get(get_one::<C>))
        .route("/entities/{key}/activate", post(activate::<C>))
        .route("/entities/{key}/deactivate", post(deactivate::<C>))
}

/// `GET /api/entities`
pub async fn list<C>(State(state): State<AppState<C>>) -> Json<Vec<EntityView>>
where
    C: DeviceClient + 'static,
{
    Json(state.registry.views())
}

/// `GET /api/entities/{key}`
pub async fn get_one<C>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<EntityView>, ApiError>
where
    C: DeviceClient + 'static,
{
    let entity = state.registry.lookup(&key)?;
    Ok(Json(entity.current()))
}

/// `POST /api/entities/{key}/activate`
///
/// Turns a direct switch on, or hands an automation switch back to the
/// controller's program. Responds with the (optimistic) view after the
/// command.
pub async fn activate<C>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<EntityView>, ApiError>
where
    C: DeviceClient + 'static,
{
    let entity = state.registry.lookup(&key)?;
    entity.activate().await?;
    Ok(Json(entity.current()))
}

/// `POST /api/entities/{key}/deactivate`
pub async fn deactivate<C>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<EntityView>, ApiError>
where
    C: DeviceClient + 'static,
{
    let entity = state.registry.lookup(&key)?;
    entity.deactivate().await?;
    Ok(Json(entity.current()))
}
