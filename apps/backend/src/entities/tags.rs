use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tags are addressed on the wire by `uuid`, not by `id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub uuid: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::taggables::Entity")]
    Taggables,
}

impl Related<super::taggables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taggables.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
