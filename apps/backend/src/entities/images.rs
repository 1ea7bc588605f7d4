use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Morph target: `(imageable_type, imageable_id)` points at a post or video.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub url: String,
    #[sea_orm(column_name = "imageable_type")]
    pub imageable_type: Option<String>,
    #[sea_orm(column_name = "imageable_id")]
    pub imageable_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
