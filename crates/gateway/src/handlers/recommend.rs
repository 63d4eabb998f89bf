//! Recommendation handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{require_param, PageParams, SuccessResponse};
use crate::extract::{AppJson, AppQuery};
use crate::AppState;
use paperdesk_common::{
    auth::CurrentUser,
    db::models::Paper,
    errors::Result,
    services::{InteractionKind, Pagination, Strategy},
};

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub data: Vec<Paper>,
    pub pagination: Pagination,
    pub strategy: Strategy,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    pub paper_id: Option<String>,
    pub interaction_type: Option<String>,
}

pub async fn recommend(
    State(state): State<AppState>,
    user: CurrentUser,
    AppQuery(paging): AppQuery<PageParams>,
) -> Result<Json<RecommendResponse>> {
    let paging = paging.resolve(&state.config.pagination);

    let result = state
        .services
        .recommend
        .get_recommendations(&user, paging.limit(), paging.offset())
        .await?;

    Ok(Json(RecommendResponse {
        data: result.items,
        pagination: paging.with_total(result.total),
        strategy: result.strategy,
    }))
}

/// Record a view/favorite/click on a recommended paper
pub async fn record_interaction(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(request): AppJson<InteractionRequest>,
) -> Result<Json<SuccessResponse<()>>> {
    let paper_id = require_param(request.paper_id, "paperId")?;
    let kind: InteractionKind = require_param(request.interaction_type, "interactionType")?.parse()?;

    state.services.recommend.record_interaction(&user, &paper_id, kind);
    Ok(Json(SuccessResponse::ok()))
}
