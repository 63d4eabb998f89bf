//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations.
//! List queries return a [`Page`] whose total is computed by a count query
//! running concurrently with the page query.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use uuid::Uuid;

/// One page of rows plus the number of rows matching the filter
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new(), total: 0 }
    }
}

/// Paper listing filter
#[derive(Debug, Clone, Default)]
pub struct PaperQuery {
    /// Case-insensitive substring over title and abstract
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// Ordering for a user's library listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LibraryOrder {
    /// Most recently favorited first
    #[default]
    AddedAt,
    /// Most recently published first
    PublishedAt,
}

/// A paper as it appears in a user's library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub paper: Paper,
    pub added_at: DateTimeWithTimeZone,
}

/// Escape LIKE wildcards so user input only ever matches literally
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `lower(table.column) LIKE '%needle%'`, portable across Postgres and SQLite
fn contains_ci(column: PaperColumn, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((PaperEntity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Paper Operations
    // ========================================================================

    /// Insert a paper row
    pub async fn insert_paper(&self, paper: Paper) -> Result<Paper> {
        let active = PaperActiveModel {
            id: Set(paper.id),
            title: Set(paper.title),
            abstract_text: Set(paper.abstract_text),
            authors: Set(paper.authors),
            published_at: Set(paper.published_at),
            tags: Set(paper.tags),
            link: Set(paper.link),
            created_at: Set(paper.created_at),
        };

        active.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find paper by ID
    pub async fn find_paper_by_id(&self, id: &str) -> Result<Option<Paper>> {
        PaperEntity::find_by_id(id.to_string())
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List papers, newest first, optionally filtered by title/abstract
    pub async fn list_papers(&self, query: &PaperQuery) -> Result<Page<Paper>> {
        let mut select = PaperEntity::find();

        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(PaperColumn::Title, term))
                    .add(contains_ci(PaperColumn::AbstractText, term)),
            );
        }

        let select = select
            .order_by_desc(PaperColumn::PublishedAt)
            .order_by_asc(PaperColumn::Id);

        let conn = self.read_conn();
        let (items, total) = futures::try_join!(
            select.clone().offset(query.offset).limit(query.limit).all(conn),
            select.clone().count(conn),
        )?;

        Ok(Page { items, total })
    }

    /// Tag strings of the given papers, skipping papers without tags
    pub async fn find_paper_tags(&self, ids: &[String]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let tags: Vec<Option<String>> = PaperEntity::find()
            .select_only()
            .column(PaperColumn::Tags)
            .filter(PaperColumn::Id.is_in(ids.iter().cloned()))
            .filter(PaperColumn::Tags.is_not_null())
            .into_tuple()
            .all(self.read_conn())
            .await?;

        Ok(tags.into_iter().flatten().collect())
    }

    /// Newest papers outside `excluded`.
    ///
    /// With a non-empty `any_tags`, only papers whose tag string contains at
    /// least one of the tags (case-insensitive substring) are returned.
    pub async fn list_papers_excluding(
        &self,
        excluded: &[String],
        any_tags: &[String],
        limit: u64,
        offset: u64,
    ) -> Result<Page<Paper>> {
        let mut select = PaperEntity::find();

        if !excluded.is_empty() {
            select = select.filter(PaperColumn::Id.is_not_in(excluded.iter().cloned()));
        }

        if !any_tags.is_empty() {
            let matches_any = any_tags
                .iter()
                .fold(Condition::any(), |cond, tag| cond.add(contains_ci(PaperColumn::Tags, tag)));
            select = select.filter(matches_any);
        }

        let select = select
            .order_by_desc(PaperColumn::PublishedAt)
            .order_by_asc(PaperColumn::Id);

        let conn = self.read_conn();
        let (items, total) = futures::try_join!(
            select.clone().offset(offset).limit(limit).all(conn),
            select.clone().count(conn),
        )?;

        Ok(Page { items, total })
    }

    // ========================================================================
    // Library Operations
    // ========================================================================

    /// Find or create a named library for a user.
    ///
    /// Runs as insert-on-conflict-do-nothing against the unique
    /// `(user_id, name)` index followed by a lookup, so concurrent callers
    /// converge on the same row. Returns the library and whether this call
    /// created it.
    pub async fn ensure_library(&self, user_id: &str, name: &str) -> Result<(UserLibrary, bool)> {
        let candidate = UserLibraryActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.to_string()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let inserted = UserLibraryEntity::insert(candidate)
            .on_conflict(
                OnConflict::columns([UserLibraryColumn::UserId, UserLibraryColumn::Name])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.write_conn())
            .await?;

        let library = UserLibraryEntity::find()
            .filter(UserLibraryColumn::UserId.eq(user_id))
            .filter(UserLibraryColumn::Name.eq(name))
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::Internal {
                message: format!("library '{}' missing after upsert for user {}", name, user_id),
            })?;

        Ok((library, inserted > 0))
    }

    /// IDs of every library owned by the user
    pub async fn library_ids_for_user(&self, user_id: &str) -> Result<Vec<Uuid>> {
        UserLibraryEntity::find()
            .select_only()
            .column(UserLibraryColumn::Id)
            .filter(UserLibraryColumn::UserId.eq(user_id))
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Add a paper to a library. Returns false if it was already there.
    pub async fn add_library_paper(&self, library_id: Uuid, paper_id: &str) -> Result<bool> {
        let entry = LibraryPaperActiveModel {
            library_id: Set(library_id),
            paper_id: Set(paper_id.to_string()),
            added_at: Set(chrono::Utc::now().into()),
        };

        let inserted = LibraryPaperEntity::insert(entry)
            .on_conflict(
                OnConflict::columns([LibraryPaperColumn::LibraryId, LibraryPaperColumn::PaperId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.write_conn())
            .await?;

        Ok(inserted > 0)
    }

    /// Remove a paper from every listed library, returning the row count
    pub async fn remove_library_paper(&self, library_ids: &[Uuid], paper_id: &str) -> Result<u64> {
        if library_ids.is_empty() {
            return Ok(0);
        }

        let result = LibraryPaperEntity::delete_many()
            .filter(LibraryPaperColumn::LibraryId.is_in(library_ids.iter().copied()))
            .filter(LibraryPaperColumn::PaperId.eq(paper_id))
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected)
    }

    /// Whether any of the listed libraries holds the paper
    pub async fn library_contains(&self, library_ids: &[Uuid], paper_id: &str) -> Result<bool> {
        if library_ids.is_empty() {
            return Ok(false);
        }

        let found = LibraryPaperEntity::find()
            .filter(LibraryPaperColumn::LibraryId.is_in(library_ids.iter().copied()))
            .filter(LibraryPaperColumn::PaperId.eq(paper_id))
            .one(self.read_conn())
            .await?;

        Ok(found.is_some())
    }

    /// Papers in the listed libraries, joined with their membership rows.
    ///
    /// `total` counts memberships, so a paper held by two of the user's
    /// libraries counts twice.
    pub async fn list_library_papers(
        &self,
        library_ids: &[Uuid],
        order: LibraryOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Page<LibraryEntry>> {
        if library_ids.is_empty() {
            return Ok(Page::empty());
        }

        let in_libraries = LibraryPaperColumn::LibraryId.is_in(library_ids.iter().copied());

        let select = LibraryPaperEntity::find()
            .filter(in_libraries.clone())
            .find_also_related(PaperEntity);

        let select = match order {
            LibraryOrder::AddedAt => select.order_by_desc(LibraryPaperColumn::AddedAt),
            LibraryOrder::PublishedAt => select.order_by_desc(PaperColumn::PublishedAt),
        }
        .order_by_asc(LibraryPaperColumn::PaperId);

        let conn = self.read_conn();
        let (rows, total) = futures::try_join!(
            select.offset(offset).limit(limit).all(conn),
            LibraryPaperEntity::find().filter(in_libraries).count(conn),
        )?;

        let items = rows
            .into_iter()
            .filter_map(|(entry, paper)| {
                paper.map(|paper| LibraryEntry {
                    paper,
                    added_at: entry.added_at,
                })
            })
            .collect();

        Ok(Page { items, total })
    }

    /// Distinct IDs of every paper in any of the user's libraries
    pub async fn favorited_paper_ids(&self, user_id: &str) -> Result<Vec<String>> {
        LibraryPaperEntity::find()
            .select_only()
            .column(LibraryPaperColumn::PaperId)
            .inner_join(UserLibraryEntity)
            .filter(UserLibraryColumn::UserId.eq(user_id))
            .distinct()
            .into_tuple()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Model Provider Operations
    // ========================================================================

    /// All provider configs, newest first
    pub async fn list_model_providers(&self) -> Result<Vec<ModelProvider>> {
        ModelProviderEntity::find()
            .order_by_desc(ModelProviderColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find provider config by ID
    pub async fn find_model_provider(&self, id: Uuid) -> Result<Option<ModelProvider>> {
        ModelProviderEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Insert a provider config
    pub async fn insert_model_provider(&self, model: ModelProviderActiveModel) -> Result<ModelProvider> {
        model.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Apply changes to an existing provider config.
    ///
    /// `apply` receives the loaded row as an active model; `updated_at` is
    /// stamped afterwards. Returns `None` when the row does not exist.
    pub async fn update_model_provider<F>(&self, id: Uuid, apply: F) -> Result<Option<ModelProvider>>
    where
        F: FnOnce(&mut ModelProviderActiveModel),
    {
        let Some(existing) = ModelProviderEntity::find_by_id(id)
            .one(self.write_conn())
            .await?
        else {
            return Ok(None);
        };

        let mut active: ModelProviderActiveModel = existing.into();
        apply(&mut active);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(self.write_conn()).await?;
        Ok(Some(updated))
    }

    /// Delete provider config by ID
    pub async fn delete_model_provider(&self, id: Uuid) -> Result<bool> {
        let result = ModelProviderEntity::delete_by_id(id)
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[test]
    fn test_library_order_default() {
        assert_eq!(LibraryOrder::default(), LibraryOrder::AddedAt);
    }
}
