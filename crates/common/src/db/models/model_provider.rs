//! Model provider credentials managed by administrators

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "model_provider_configs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Provider kind, e.g. "openai", "azure-openai", "custom-http"
    #[sea_orm(column_type = "Text")]
    pub provider: String,

    #[sea_orm(column_type = "Text")]
    pub endpoint: String,

    /// Stored as given; responses go through the redacted view instead
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing)]
    pub api_key: String,

    pub enabled: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
