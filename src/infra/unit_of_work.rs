//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and wraps multi-step writes in one database
//! transaction, committed on success and rolled back on error.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    account_query, tag_query, AccountRepository, AccountStore, TagRepository, TagStore,
};
use crate::domain::{Account, NewAccount, Profile, Tag};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to the generic method.
/// For testing, mock the repositories it hands out.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get account repository
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    /// Get tag repository
    fn tags(&self) -> Arc<dyn TagRepository>;

    /// Execute a closure within a read-committed transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get account repository for this transaction
    pub fn accounts(&self) -> TxAccountRepository<'_> {
        TxAccountRepository { txn: self.txn }
    }

    /// Get tag repository for this transaction
    pub fn tags(&self) -> TxTagRepository<'_> {
        TxTagRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    account_repo: Arc<AccountStore>,
    tag_repo: Arc<TagStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let account_repo = Arc::new(AccountStore::new(db.clone()));
        let tag_repo = Arc::new(TagStore::new(db.clone()));
        Self {
            db,
            account_repo,
            tag_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.account_repo.clone()
    }

    fn tags(&self) -> Arc<dyn TagRepository> {
        self.tag_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware account repository.
pub struct TxAccountRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAccountRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        account_query::find_by_id(self.txn, id).await
    }

    pub async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<Account>> {
        account_query::find_by_nickname(self.txn, nickname).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        account_query::find_by_email(self.txn, email).await
    }

    pub async fn create(&self, account: NewAccount) -> AppResult<Account> {
        account_query::create(self.txn, account).await
    }

    pub async fn update_profile(&self, id: Uuid, profile: Profile) -> AppResult<Account> {
        account_query::update_profile(self.txn, id, profile).await
    }

    pub async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        account_query::update_password(self.txn, id, password_hash).await
    }

    pub async fn add_tag(&self, id: Uuid, tag_id: Uuid) -> AppResult<bool> {
        account_query::add_tag(self.txn, id, tag_id).await
    }

    pub async fn remove_tag(&self, id: Uuid, tag_id: Uuid) -> AppResult<bool> {
        account_query::remove_tag(self.txn, id, tag_id).await
    }
}

/// Transaction-aware tag repository.
pub struct TxTagRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxTagRepository<'a> {
    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<Tag>> {
        tag_query::find_by_title(self.txn, title).await
    }

    pub async fn find_or_create(&self, title: &str) -> AppResult<Tag> {
        tag_query::find_or_create(self.txn, title).await
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(move |$ctx| Box::pin(async move { $body })).await
    };
}
