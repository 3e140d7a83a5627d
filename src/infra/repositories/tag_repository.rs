//! Tag repository: lookup by title and lazy creation.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read side of the tags table.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Titles of every known tag, sorted
    async fn list_titles(&self) -> AppResult<Vec<String>>;
}

/// Tag reads on the shared connection pool
pub struct TagStore {
    db: DatabaseConnection,
}

impl TagStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for TagStore {
    async fn list_titles(&self) -> AppResult<Vec<String>> {
        query::list_titles(&self.db).await
    }
}

pub(crate) mod query {
    use sea_orm::{
        sea_query::OnConflict, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
        Set,
    };
    use uuid::Uuid;

    use super::super::entities::tag::{self, ActiveModel, Entity as TagEntity};
    use crate::domain::Tag;
    use crate::errors::{AppError, AppResult};

    pub async fn find_by_title<C: ConnectionTrait>(db: &C, title: &str) -> AppResult<Option<Tag>> {
        let found = TagEntity::find()
            .filter(tag::Column::Title.eq(title))
            .one(db)
            .await?;
        Ok(found.map(Tag::from))
    }

    /// Insert-or-ignore on the unique title, then read back whichever row won.
    pub async fn find_or_create<C: ConnectionTrait>(db: &C, title: &str) -> AppResult<Tag> {
        let candidate = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
        };

        let inserted = TagEntity::insert(candidate)
            .on_conflict(OnConflict::column(tag::Column::Title).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
        if inserted > 0 {
            tracing::debug!(tag = %title, "Tag created");
        }

        find_by_title(db, title)
            .await?
            .ok_or_else(|| AppError::internal(format!("tag {title:?} missing after upsert")))
    }

    pub async fn list_titles<C: ConnectionTrait>(db: &C) -> AppResult<Vec<String>> {
        let models = TagEntity::find()
            .order_by_asc(tag::Column::Title)
            .all(db)
            .await?;
        Ok(models.into_iter().map(|m| m.title).collect())
    }
}
