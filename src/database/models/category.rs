use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Categories are managed by an admin surface outside this service;
/// handlers only ever read them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}
