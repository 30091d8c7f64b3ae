use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{CreateIngredientRequest, IngredientResponse, ListIngredientsQuery};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn ingredient_routes() -> Router<AppState> {
    Router::new().route("/ingredients", get(list_ingredients).post(create_ingredient))
}

/// GET /ingredients[?assigned_only=1]
#[instrument(skip(state, user, query), fields(user_id = %user.id))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ListIngredientsQuery>, QueryRejection>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let Query(q) = query.map_err(|e| {
        warn!(error = %e, "rejected ingredient query");
        ApiError::BadRequest(e.body_text())
    })?;
    let filter = q.filter()?;
    let rows = state.store.list_ingredients(user.id, filter).await?;
    Ok(Json(rows.into_iter().map(IngredientResponse::from).collect()))
}

/// POST /ingredients { name }
#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_ingredient(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateIngredientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "rejected ingredient payload");
        ApiError::BadRequest(e.body_text())
    })?;
    let name = body
        .name
        .ok_or_else(|| ApiError::BadRequest("name is required".into()))?;

    let ingredient = state.store.create_ingredient(user.id, &name).await?;
    info!(ingredient_id = ingredient.id, "ingredient created");
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}
