//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Account;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub nickname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            nickname: model.nickname,
            email: model.email,
            password_hash: model.password_hash,
            bio: model.bio,
            url: model.url,
            occupation: model.occupation,
            location: model.location,
            profile_image: model.profile_image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
