//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories for accounts and tags
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{AccountRepository, AccountStore, TagRepository, TagStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxAccountRepository, TxTagRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAccountRepository, MockTagRepository};
