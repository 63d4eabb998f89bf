//! Paper entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "papers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Source identifier, e.g. an arXiv id
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_name = "abstract", column_type = "Text")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Author names, comma separated as delivered by the source
    #[sea_orm(column_type = "Text")]
    pub authors: String,

    pub published_at: DateTimeWithTimeZone,

    /// Comma-delimited tag list; see [`crate::services::tags`]
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub link: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::library_paper::Entity")]
    LibraryEntries,
}

impl Related<super::library_paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
