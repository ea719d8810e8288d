use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub post_id: i64,
}

impl Comment {
    /// Location of the comment within its post's detail page
    pub fn absolute_url(&self) -> String {
        format!("/blog/{}/#comment-{}", self.post_id, self.id)
    }
}
