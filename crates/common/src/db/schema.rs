//! Schema bootstrap
//!
//! Tables are derived from the entity definitions. The composite unique
//! index on `user_libraries (user_id, name)` is what makes the default
//! library upsert atomic, so it is created here alongside the tables.

use crate::db::models::*;
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use tracing::info;

pub const USER_LIBRARY_NAME_INDEX: &str = "idx_user_libraries_user_name";
pub const PAPER_PUBLISHED_INDEX: &str = "idx_papers_published_at";

fn table<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    schema
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned()
}

fn indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name(USER_LIBRARY_NAME_INDEX)
            .table(UserLibraryEntity)
            .col(UserLibraryColumn::UserId)
            .col(UserLibraryColumn::Name)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name(PAPER_PUBLISHED_INDEX)
            .table(PaperEntity)
            .col(PaperColumn::PublishedAt)
            .to_owned(),
    ]
}

/// Create all tables and indexes that do not exist yet
pub async fn create_schema(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    // Referenced tables first
    let tables = [
        table(&schema, PaperEntity),
        table(&schema, UserLibraryEntity),
        table(&schema, LibraryPaperEntity),
        table(&schema, ModelProviderEntity),
    ];

    for stmt in &tables {
        conn.execute(backend.build(stmt)).await?;
    }

    for stmt in &indexes() {
        conn.execute(backend.build(stmt)).await?;
    }

    info!(tables = tables.len(), "Database schema ready");
    Ok(())
}
