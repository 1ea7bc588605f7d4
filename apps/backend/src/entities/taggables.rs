use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction row tying a tag to a post or video.
///
/// Unique on `(tag_id, taggable_type, taggable_id)`; `id` only records
/// insertion order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "taggables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "tag_id")]
    pub tag_id: i64,
    #[sea_orm(column_name = "taggable_type")]
    pub taggable_type: String,
    #[sea_orm(column_name = "taggable_id")]
    pub taggable_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tags::Entity",
        from = "Column::TagId",
        to = "super::tags::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
