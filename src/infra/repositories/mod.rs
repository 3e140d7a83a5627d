//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod account_repository;
pub(crate) mod entities;
mod tag_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use tag_repository::{TagRepository, TagStore};

pub(crate) use account_repository::query as account_query;
pub(crate) use tag_repository::query as tag_query;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tag_repository::MockTagRepository;
