//! Paper listing and lookup

use crate::db::models::Paper;
use crate::db::{Page, PaperQuery, Repository};
use crate::errors::{AppError, Result};
use crate::metrics::{record_paper_search, Timer};

pub struct PaperService {
    repo: Repository,
}

impl PaperService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Newest papers first; a non-blank `search` filters title and abstract
    /// by case-insensitive substring.
    pub async fn list_papers(&self, search: Option<&str>, limit: u64, offset: u64) -> Result<Page<Paper>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let timer = Timer::start();

        let query = PaperQuery {
            search: search.map(String::from),
            limit,
            offset,
        };
        let page = self.repo.list_papers(&query).await?;

        record_paper_search(timer.elapsed_secs(), search.is_some());
        tracing::debug!(
            search = ?search,
            limit,
            offset,
            returned = page.items.len(),
            total = page.total,
            "Papers listed"
        );

        Ok(page)
    }

    pub async fn get_paper(&self, id: &str) -> Result<Paper> {
        self.repo
            .find_paper_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Paper", id))
    }
}
