//! Per-user paper libraries
//!
//! Plain favorite/unfavorite actions go through the user's default library,
//! which is created on the first add. Removal, membership checks and
//! listings span every library the user owns.

use crate::auth::CurrentUser;
use crate::db::models::DEFAULT_LIBRARY_NAME;
use crate::db::{LibraryEntry, LibraryOrder, Page, Repository};
use crate::errors::{AppError, Result};
use crate::metrics::record_library_change;
use serde::Serialize;
use std::str::FromStr;

/// Result of adding a paper to the default library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOutcome {
    pub success: bool,
    pub already_exists: bool,
}

/// Result of removing a paper from the user's libraries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FromStr for LibraryOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "addedAt" => Ok(LibraryOrder::AddedAt),
            "publishedAt" => Ok(LibraryOrder::PublishedAt),
            other => Err(AppError::InvalidInput {
                message: format!("orderBy must be addedAt or publishedAt, got '{}'", other),
                field: Some("orderBy".to_string()),
            }),
        }
    }
}

pub struct LibraryService {
    repo: Repository,
}

impl LibraryService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Add a paper to the user's default library
    pub async fn add_to_library(&self, user: &CurrentUser, paper_id: &str) -> Result<AddOutcome> {
        if self.repo.find_paper_by_id(paper_id).await?.is_none() {
            return Err(AppError::not_found("Paper", paper_id));
        }

        let (library, created) = self.repo.ensure_library(user.id(), DEFAULT_LIBRARY_NAME).await?;
        if created {
            tracing::info!(user_id = %user.id(), library_id = %library.id, "Default library created");
        }

        let inserted = self.repo.add_library_paper(library.id, paper_id).await?;

        record_library_change("add", if inserted { "added" } else { "duplicate" });
        tracing::info!(
            user_id = %user.id(),
            library_id = %library.id,
            paper_id = %paper_id,
            already_exists = !inserted,
            "library.add"
        );

        Ok(AddOutcome {
            success: true,
            already_exists: !inserted,
        })
    }

    /// Remove a paper from every library the user owns
    pub async fn remove_from_library(&self, user: &CurrentUser, paper_id: &str) -> Result<RemoveOutcome> {
        let library_ids = self.repo.library_ids_for_user(user.id()).await?;

        if library_ids.is_empty() {
            record_library_change("remove", "no_library");
            return Ok(RemoveOutcome {
                success: false,
                removed_count: None,
                message: Some("User has no library".to_string()),
            });
        }

        let removed = self.repo.remove_library_paper(&library_ids, paper_id).await?;

        record_library_change("remove", if removed > 0 { "removed" } else { "absent" });
        tracing::info!(
            user_id = %user.id(),
            paper_id = %paper_id,
            removed,
            "library.remove"
        );

        Ok(RemoveOutcome {
            success: true,
            removed_count: Some(removed),
            message: None,
        })
    }

    pub async fn is_in_library(&self, user: &CurrentUser, paper_id: &str) -> Result<bool> {
        let library_ids = self.repo.library_ids_for_user(user.id()).await?;
        self.repo.library_contains(&library_ids, paper_id).await
    }

    /// Papers across the user's libraries with their membership timestamp
    pub async fn get_user_library_papers(
        &self,
        user: &CurrentUser,
        limit: u64,
        offset: u64,
        order: LibraryOrder,
    ) -> Result<Page<LibraryEntry>> {
        let library_ids = self.repo.library_ids_for_user(user.id()).await?;
        if library_ids.is_empty() {
            return Ok(Page::empty());
        }

        self.repo
            .list_library_papers(&library_ids, order, limit, offset)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{paper, repo, seed};

    async fn service() -> (LibraryService, Repository) {
        let repo = repo().await;
        seed(
            &repo,
            vec![
                paper("P1", "First", Some("nlp"), 1),
                paper("P2", "Second", Some("cv"), 2),
                paper("P3", "Third", None, 3),
            ],
        )
        .await;
        (LibraryService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_duplicate_add_reports_already_exists() {
        let (svc, repo) = service().await;
        let user = CurrentUser::new("u1");

        let first = svc.add_to_library(&user, "P1").await.unwrap();
        assert_eq!(first, AddOutcome { success: true, already_exists: false });

        let second = svc.add_to_library(&user, "P1").await.unwrap();
        assert_eq!(second, AddOutcome { success: true, already_exists: true });

        let ids = repo.library_ids_for_user("u1").await.unwrap();
        assert_eq!(ids.len(), 1);
        let page = repo
            .list_library_papers(&ids, LibraryOrder::AddedAt, 20, 0)
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_add_unknown_paper_is_not_found() {
        let (svc, repo) = service().await;
        let user = CurrentUser::new("u1");

        let err = svc.add_to_library(&user, "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        // No library is created for a rejected add
        assert!(repo.library_ids_for_user("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_without_library() {
        let (svc, _) = service().await;
        let outcome = svc
            .remove_from_library(&CurrentUser::new("ghost"), "P1")
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.removed_count, None);
        assert!(outcome.message.is_some());
    }

    #[tokio::test]
    async fn test_membership_round_trip() {
        let (svc, _) = service().await;
        let user = CurrentUser::new("u1");

        assert!(!svc.is_in_library(&user, "P2").await.unwrap());
        svc.add_to_library(&user, "P2").await.unwrap();
        assert!(svc.is_in_library(&user, "P2").await.unwrap());

        let outcome = svc.remove_from_library(&user, "P2").await.unwrap();
        assert_eq!(outcome.removed_count, Some(1));
        assert!(!svc.is_in_library(&user, "P2").await.unwrap());

        // Removing again succeeds with nothing removed
        let outcome = svc.remove_from_library(&user, "P2").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.removed_count, Some(0));
    }

    #[tokio::test]
    async fn test_libraries_are_per_user() {
        let (svc, _) = service().await;
        svc.add_to_library(&CurrentUser::new("u1"), "P1").await.unwrap();

        assert!(!svc.is_in_library(&CurrentUser::new("u2"), "P1").await.unwrap());
    }

    #[tokio::test]
    async fn test_listing_orders_and_counts() {
        let (svc, _) = service().await;
        let user = CurrentUser::new("u1");

        for id in ["P2", "P1", "P3"] {
            svc.add_to_library(&user, id).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let page = svc
            .get_user_library_papers(&user, 2, 0, LibraryOrder::AddedAt)
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|e| e.paper.id.as_str()).collect();
        assert_eq!(ids, vec!["P3", "P1"]);
        assert_eq!(page.total, 3);

        let page = svc
            .get_user_library_papers(&user, 20, 0, LibraryOrder::PublishedAt)
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|e| e.paper.id.as_str()).collect();
        assert_eq!(ids, vec!["P3", "P2", "P1"]);
    }

    #[tokio::test]
    async fn test_listing_without_library_is_empty() {
        let (svc, _) = service().await;
        let page = svc
            .get_user_library_papers(&CurrentUser::new("ghost"), 20, 0, LibraryOrder::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_order_parsing() {
        assert_eq!("addedAt".parse::<LibraryOrder>().unwrap(), LibraryOrder::AddedAt);
        assert_eq!("publishedAt".parse::<LibraryOrder>().unwrap(), LibraryOrder::PublishedAt);
        assert!("title".parse::<LibraryOrder>().is_err());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(AddOutcome { success: true, already_exists: true }).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "alreadyExists": true}));

        let json = serde_json::to_value(RemoveOutcome {
            success: true,
            removed_count: Some(2),
            message: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "removedCount": 2}));
    }
}
