//! Tag database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Tag;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_tag::Entity")]
    AccountTag,
}

impl Related<super::account_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tag {
    fn from(model: Model) -> Self {
        Tag {
            id: model.id,
            title: model.title,
        }
    }
}
