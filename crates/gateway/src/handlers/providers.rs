//! Model provider settings handlers (admin only)

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use super::{DataResponse, SuccessResponse};
use crate::extract::{AppJson, AppPath};
use crate::AppState;
use paperdesk_common::{
    auth::Admin,
    errors::{AppError, Result},
    services::{CreateModelProviderInput, ModelProviderView, UpdateModelProviderInput},
};

#[derive(Debug, Default, Deserialize)]
pub struct ToggleRequest {
    pub enabled: Option<bool>,
}

pub async fn list_providers(
    State(state): State<AppState>,
    _admin: Admin,
) -> Result<Json<DataResponse<Vec<ModelProviderView>>>> {
    let data = state.services.providers.list_model_providers().await?;
    Ok(Json(DataResponse { data }))
}

pub async fn create_provider(
    State(state): State<AppState>,
    _admin: Admin,
    AppJson(input): AppJson<CreateModelProviderInput>,
) -> Result<Json<SuccessResponse<ModelProviderView>>> {
    let view = state.services.providers.create_model_provider(input).await?;
    Ok(Json(SuccessResponse::with(view)))
}

/// Single provider, key masked like every other response
pub async fn get_provider(
    State(state): State<AppState>,
    _admin: Admin,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<DataResponse<ModelProviderView>>> {
    let provider = state
        .services
        .providers
        .get_model_provider(id)
        .await?
        .ok_or_else(|| AppError::not_found("ModelProvider", id))?;

    Ok(Json(DataResponse { data: provider.into() }))
}

pub async fn update_provider(
    State(state): State<AppState>,
    _admin: Admin,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateModelProviderInput>,
) -> Result<Json<SuccessResponse<ModelProviderView>>> {
    let view = state.services.providers.update_model_provider(id, input).await?;
    Ok(Json(SuccessResponse::with(view)))
}

pub async fn delete_provider(
    State(state): State<AppState>,
    _admin: Admin,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<SuccessResponse<()>>> {
    state.services.providers.delete_model_provider(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Enable or disable a provider; `enabled` defaults to true
pub async fn toggle_provider(
    State(state): State<AppState>,
    _admin: Admin,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<ToggleRequest>,
) -> Result<Json<SuccessResponse<ModelProviderView>>> {
    let enabled = request.enabled.unwrap_or(true);
    let view = state.services.providers.toggle_model_provider(id, enabled).await?;
    Ok(Json(SuccessResponse::with(view)))
}
