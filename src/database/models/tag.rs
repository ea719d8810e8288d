use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tags use get-or-create semantics keyed on exact name; the slug is
/// derived from the name once, at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}
