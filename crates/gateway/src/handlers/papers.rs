//! Paper browsing handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use super::{ListResponse, PageParams};
use crate::extract::{AppPath, AppQuery};
use crate::AppState;
use paperdesk_common::{
    db::models::Paper,
    errors::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListPapersQuery {
    /// Free-text search over title and abstract
    pub q: Option<String>,
    #[serde(flatten)]
    pub paging: PageParams,
}

/// List papers, newest first
///
/// Any storage failure is reported as `DATABASE_UNAVAILABLE` with an empty
/// `data` array so listing pages can still render.
pub async fn list_papers(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListPapersQuery>,
) -> Result<Json<ListResponse<Paper>>> {
    let paging = query.paging.resolve(&state.config.pagination);

    let page = state
        .services
        .papers
        .list_papers(query.q.as_deref(), paging.limit(), paging.offset())
        .await
        .map_err(|e| match e {
            AppError::DatabaseUnavailable { .. } => e,
            other => AppError::DatabaseUnavailable {
                message: other.to_string(),
            },
        })?;

    Ok(Json(ListResponse {
        data: page.items,
        pagination: paging.with_total(page.total),
    }))
}

/// Get a paper by ID
pub async fn get_paper(
    State(state): State<AppState>,
    AppPath(paper_id): AppPath<String>,
) -> Result<Json<Paper>> {
    let paper = state.services.papers.get_paper(&paper_id).await?;
    Ok(Json(paper))
}
