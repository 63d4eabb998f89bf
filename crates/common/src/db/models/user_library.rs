//! Per-user paper collection

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the collection used by plain favorite/unfavorite actions
pub const DEFAULT_LIBRARY_NAME: &str = "默认收藏";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_libraries")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub user_id: String,

    /// Unique per user together with `user_id`
    #[sea_orm(column_type = "Text")]
    pub name: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::library_paper::Entity")]
    Entries,
}

impl Related<super::library_paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
