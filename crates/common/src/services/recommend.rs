//! Recommendations from favorite-tag overlap
//!
//! The user's favorites are excluded from every result. When the favorites
//! carry tags, papers sharing at least one of them are offered first;
//! otherwise (or when nothing matches) the newest papers are returned.

use crate::auth::CurrentUser;
use crate::db::models::Paper;
use crate::db::{Page, Repository};
use crate::errors::{AppError, Result};
use crate::metrics::{record_interaction, record_recommendation};
use crate::services::tags::collect_tags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which branch produced a recommendation page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    TagBased,
    LatestExcludingFavorites,
    Latest,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::TagBased => "tag-based",
            Strategy::LatestExcludingFavorites => "latest-excluding-favorites",
            Strategy::Latest => "latest",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub items: Vec<Paper>,
    /// Rows matching the answering branch's filter
    pub total: u64,
    pub strategy: Strategy,
}

/// How a user interacted with a recommended paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Favorite,
    Click,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Favorite => "favorite",
            InteractionKind::Click => "click",
        }
    }
}

impl FromStr for InteractionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "view" => Ok(InteractionKind::View),
            "favorite" => Ok(InteractionKind::Favorite),
            "click" => Ok(InteractionKind::Click),
            other => Err(AppError::InvalidInput {
                message: format!("interactionType must be view, favorite or click, got '{}'", other),
                field: Some("interactionType".to_string()),
            }),
        }
    }
}

pub struct RecommendService {
    repo: Repository,
}

impl RecommendService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn get_recommendations(
        &self,
        user: &CurrentUser,
        limit: u64,
        offset: u64,
    ) -> Result<Recommendation> {
        let excluded = self.repo.favorited_paper_ids(user.id()).await?;

        if !excluded.is_empty() {
            let tag_strings = self.repo.find_paper_tags(&excluded).await?;
            let tags: Vec<String> = collect_tags(tag_strings).into_iter().collect();

            if !tags.is_empty() {
                let page = self
                    .repo
                    .list_papers_excluding(&excluded, &tags, limit, offset)
                    .await?;

                if !page.items.is_empty() {
                    tracing::debug!(
                        user_id = %user.id(),
                        tags = tags.len(),
                        excluded = excluded.len(),
                        "recommend.tag_based"
                    );
                    return Ok(finish(page, Strategy::TagBased));
                }
            }
        }

        let strategy = if excluded.is_empty() {
            Strategy::Latest
        } else {
            Strategy::LatestExcludingFavorites
        };

        let page = self
            .repo
            .list_papers_excluding(&excluded, &[], limit, offset)
            .await?;

        tracing::debug!(
            user_id = %user.id(),
            excluded = excluded.len(),
            strategy = %strategy,
            "recommend.latest"
        );

        Ok(finish(page, strategy))
    }

    /// Note an interaction with a recommended paper. Nothing is persisted.
    pub fn record_interaction(&self, user: &CurrentUser, paper_id: &str, kind: InteractionKind) {
        record_interaction(kind.as_str());
        tracing::info!(
            user_id = %user.id(),
            paper_id = %paper_id,
            kind = kind.as_str(),
            "recommend.interaction"
        );
    }
}

fn finish(page: Page<Paper>, strategy: Strategy) -> Recommendation {
    record_recommendation(strategy.as_str());
    Recommendation {
        items: page.items,
        total: page.total,
        strategy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::library::LibraryService;
    use crate::services::test_support::{paper, repo, seed};

    async fn services() -> (RecommendService, LibraryService) {
        let repo = repo().await;
        seed(
            &repo,
            vec![
                paper("P1", "One", Some("nlp,bert"), 1),
                paper("P2", "Two", Some("cv"), 2),
                paper("P3", "Three", Some("nlp"), 3),
                paper("P4", "Four", Some("cv"), 4),
                paper("P5", "Five", Some("robotics"), 5),
            ],
        )
        .await;
        (RecommendService::new(repo.clone()), LibraryService::new(repo))
    }

    fn ids(rec: &Recommendation) -> Vec<&str> {
        rec.items.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_tag_based() {
        let (rec, lib) = services().await;
        let user = CurrentUser::new("u1");
        lib.add_to_library(&user, "P1").await.unwrap();
        lib.add_to_library(&user, "P2").await.unwrap();

        let result = rec.get_recommendations(&user, 20, 0).await.unwrap();
        assert_eq!(result.strategy, Strategy::TagBased);
        assert_eq!(ids(&result), vec!["P4", "P3"]);
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn test_latest_without_favorites() {
        let (rec, _) = services().await;
        let result = rec
            .get_recommendations(&CurrentUser::new("new-user"), 2, 0)
            .await
            .unwrap();

        assert_eq!(result.strategy, Strategy::Latest);
        assert_eq!(ids(&result), vec!["P5", "P4"]);
        assert_eq!(result.total, 5);
    }

    #[tokio::test]
    async fn test_falls_back_when_no_tag_matches() {
        let (rec, lib) = services().await;
        let user = CurrentUser::new("u1");
        lib.add_to_library(&user, "P5").await.unwrap();

        let result = rec.get_recommendations(&user, 20, 0).await.unwrap();
        assert_eq!(result.strategy, Strategy::LatestExcludingFavorites);
        assert_eq!(ids(&result), vec!["P4", "P3", "P2", "P1"]);
        assert_eq!(result.total, 4);
    }

    #[tokio::test]
    async fn test_tag_page_past_the_end_falls_back() {
        let (rec, lib) = services().await;
        let user = CurrentUser::new("u1");
        lib.add_to_library(&user, "P1").await.unwrap();

        // Only P3 shares a tag; offset 1 leaves the tag page empty
        let result = rec.get_recommendations(&user, 20, 1).await.unwrap();
        assert_eq!(result.strategy, Strategy::LatestExcludingFavorites);
        assert_eq!(ids(&result), vec!["P4", "P3", "P2"]);
        assert_eq!(result.total, 4);
    }

    #[tokio::test]
    async fn test_favorites_never_recommended() {
        let (rec, lib) = services().await;
        let user = CurrentUser::new("u1");
        for id in ["P1", "P2", "P3", "P4"] {
            lib.add_to_library(&user, id).await.unwrap();
        }

        let result = rec.get_recommendations(&user, 20, 0).await.unwrap();
        assert_eq!(ids(&result), vec!["P5"]);
        assert_eq!(result.strategy, Strategy::LatestExcludingFavorites);
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(
            serde_json::to_string(&Strategy::LatestExcludingFavorites).unwrap(),
            "\"latest-excluding-favorites\""
        );
        assert_eq!(Strategy::TagBased.to_string(), "tag-based");
    }

    #[test]
    fn test_interaction_parsing() {
        assert_eq!("view".parse::<InteractionKind>().unwrap(), InteractionKind::View);
        assert!("share".parse::<InteractionKind>().is_err());
    }
}
