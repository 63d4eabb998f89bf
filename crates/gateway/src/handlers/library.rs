//! Favorites library handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{require_param, ListResponse, PageParams, SuccessResponse};
use crate::extract::{AppJson, AppQuery};
use crate::AppState;
use paperdesk_common::{
    auth::CurrentUser,
    db::{LibraryEntry, LibraryOrder},
    errors::Result,
    services::{AddOutcome, RemoveOutcome},
};

#[derive(Debug, Deserialize)]
pub struct ListLibraryQuery {
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    #[serde(flatten)]
    pub paging: PageParams,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToLibraryRequest {
    pub paper_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperIdQuery {
    pub paper_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub in_library: bool,
}

/// List the caller's library
pub async fn list_library(
    State(state): State<AppState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<ListLibraryQuery>,
) -> Result<Json<ListResponse<LibraryEntry>>> {
    let order = match query.order_by.as_deref() {
        Some(raw) => raw.parse::<LibraryOrder>()?,
        None => LibraryOrder::default(),
    };
    let paging = query.paging.resolve(&state.config.pagination);

    let page = state
        .services
        .library
        .get_user_library_papers(&user, paging.limit(), paging.offset(), order)
        .await?;

    Ok(Json(ListResponse {
        data: page.items,
        pagination: paging.with_total(page.total),
    }))
}

/// Favorite a paper
pub async fn add_to_library(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(request): AppJson<AddToLibraryRequest>,
) -> Result<Json<SuccessResponse<AddOutcome>>> {
    let paper_id = require_param(request.paper_id, "paperId")?;
    let outcome = state.services.library.add_to_library(&user, &paper_id).await?;
    Ok(Json(SuccessResponse::with(outcome)))
}

/// Unfavorite a paper
pub async fn remove_from_library(
    State(state): State<AppState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<PaperIdQuery>,
) -> Result<Json<SuccessResponse<RemoveOutcome>>> {
    let paper_id = require_param(query.paper_id, "paperId")?;
    let outcome = state
        .services
        .library
        .remove_from_library(&user, &paper_id)
        .await?;
    Ok(Json(SuccessResponse::with(outcome)))
}

/// Whether a paper is in any of the caller's libraries
pub async fn check_library(
    State(state): State<AppState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<PaperIdQuery>,
) -> Result<Json<CheckResponse>> {
    let paper_id = require_param(query.paper_id, "paperId")?;
    let in_library = state.services.library.is_in_library(&user, &paper_id).await?;
    Ok(Json(CheckResponse { in_library }))
}
