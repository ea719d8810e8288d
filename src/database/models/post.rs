use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    /// Short teaser shown in listings
    pub hook_text: String,
    pub content: String,
    pub head_image: Option<String>,
    pub file_upload: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Immutable after creation
    pub author_id: i64,
    /// None means the post sits in the uncategorized bucket
    pub category_id: Option<i64>,
}

impl Post {
    pub fn absolute_url(&self) -> String {
        format!("/blog/{}/", self.id)
    }
}

/// Fields accepted when creating a post. The author comes from the
/// authenticated requester, never from the form.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub hook_text: String,
    pub content: String,
    pub head_image: Option<String>,
    pub file_upload: Option<String>,
    pub author_id: i64,
    pub category_id: Option<i64>,
}

/// Fields accepted when updating a post. Author is deliberately absent.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub hook_text: String,
    pub content: String,
    pub head_image: Option<String>,
    pub file_upload: Option<String>,
    pub category_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_uses_post_id() {
        let post = Post {
            id: 1,
            title: "first".to_string(),
            hook_text: String::new(),
            content: "body".to_string(),
            head_image: None,
            file_upload: None,
            created_at: Utc::now(),
            author_id: 1,
            category_id: None,
        };
        assert_eq!(post.absolute_url(), "/blog/1/");
    }
}
