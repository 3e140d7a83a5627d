//! Account repository: identity lookup, profile/password updates and tag membership.
//!
//! The pooled `AccountRepository` only reads. Every write goes through
//! `query` on a transaction handed out by the Unit of Work.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::domain::{Account, Tag};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read side of the accounts table.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Tags of the account, ordered by title
    async fn tags(&self, id: Uuid) -> AppResult<Vec<Tag>>;
}

/// Account reads on the shared connection pool
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        query::find_by_id(&self.db, id).await
    }

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<Account>> {
        query::find_by_nickname(&self.db, nickname).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        query::find_by_email(&self.db, email).await
    }

    async fn tags(&self, id: Uuid) -> AppResult<Vec<Tag>> {
        query::tags(&self.db, id).await
    }
}

/// Queries shared by the pooled store and the transactional repository.
pub(crate) mod query {
    use sea_orm::{
        sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
        JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
    };
    use uuid::Uuid;

    use super::super::entities::{
        account::{self, ActiveModel, Entity as AccountEntity},
        account_tag::{self, Entity as AccountTagEntity},
        tag::{self, Entity as TagEntity},
    };
    use crate::domain::{Account, NewAccount, Profile, Tag};
    use crate::errors::{AppError, AppResult, OptionExt};

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Account>> {
        let found = AccountEntity::find_by_id(id).one(db).await?;
        Ok(found.map(Account::from))
    }

    pub async fn find_by_nickname<C: ConnectionTrait>(
        db: &C,
        nickname: &str,
    ) -> AppResult<Option<Account>> {
        let found = AccountEntity::find()
            .filter(account::Column::Nickname.eq(nickname))
            .one(db)
            .await?;
        Ok(found.map(Account::from))
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> AppResult<Option<Account>> {
        let found = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(db)
            .await?;
        Ok(found.map(Account::from))
    }

    /// A concurrent insert of the same nickname or email surfaces as `Taken`.
    pub async fn create<C: ConnectionTrait>(db: &C, account: NewAccount) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let row = ActiveModel {
            id: Set(Uuid::new_v4()),
            nickname: Set(account.nickname),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            bio: Set(None),
            url: Set(None),
            occupation: Set(None),
            location: Set(None),
            profile_image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = row.insert(db).await.map_err(unique_to_taken)?;
        Ok(Account::from(model))
    }

    fn unique_to_taken(err: DbErr) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("email") => {
                AppError::Taken("Email")
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Taken("Nickname"),
            _ => AppError::Database(err),
        }
    }

    pub async fn update_profile<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        profile: Profile,
    ) -> AppResult<Account> {
        let stored = AccountEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_account_not_found()?;

        let mut row: ActiveModel = stored.into();
        row.bio = Set(profile.bio);
        row.url = Set(profile.url);
        row.occupation = Set(profile.occupation);
        row.location = Set(profile.location);
        row.profile_image = Set(profile.profile_image);
        row.updated_at = Set(chrono::Utc::now());

        Ok(Account::from(row.update(db).await?))
    }

    pub async fn update_password<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        password_hash: String,
    ) -> AppResult<()> {
        let stored = AccountEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_account_not_found()?;

        let mut row: ActiveModel = stored.into();
        row.password_hash = Set(password_hash);
        row.updated_at = Set(chrono::Utc::now());

        row.update(db).await?;
        Ok(())
    }

    pub async fn tags<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Vec<Tag>> {
        let models = TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::AccountTag.def())
            .filter(account_tag::Column::AccountId.eq(id))
            .order_by_asc(tag::Column::Title)
            .all(db)
            .await?;

        Ok(models.into_iter().map(Tag::from).collect())
    }

    /// Returns false when the membership already existed, including when a
    /// concurrent transaction committed it first.
    pub async fn add_tag<C: ConnectionTrait>(db: &C, id: Uuid, tag_id: Uuid) -> AppResult<bool> {
        let membership = account_tag::ActiveModel {
            account_id: Set(id),
            tag_id: Set(tag_id),
        };

        let inserted = AccountTagEntity::insert(membership)
            .on_conflict(
                OnConflict::columns([account_tag::Column::AccountId, account_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn remove_tag<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        tag_id: Uuid,
    ) -> AppResult<bool> {
        let result = AccountTagEntity::delete_by_id((id, tag_id)).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}
