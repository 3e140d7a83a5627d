//! Tag domain entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Interest label shared across accounts, unique by title
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
}
