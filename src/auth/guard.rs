//! Authorization rules for post and comment mutations.
//!
//! Guards are pure functions over the (possibly absent) requester; every
//! handler runs its guard before touching the store, so a failed gate
//! never leaves a partial write behind.

use crate::auth::AuthUser;
use crate::database::models::{Comment, Post};

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Allowed,
    /// Fatal to the request, surfaced as 403
    Forbidden,
    /// Not an error: the caller is sent elsewhere instead
    Redirect(String),
}

/// Creating a post needs an authenticated superuser or staff member.
/// Anyone else is quietly sent back to the post list.
pub fn can_create_post(user: Option<&AuthUser>) -> Gate {
    match user {
        Some(user) if user.is_superuser || user.is_staff => Gate::Allowed,
        _ => Gate::Redirect("/blog/".to_string()),
    }
}

/// Only the post's author may update it
pub fn can_update_post(user: Option<&AuthUser>, post: &Post) -> Gate {
    match user {
        Some(user) if user.user_id == post.author_id => Gate::Allowed,
        _ => Gate::Forbidden,
    }
}

/// Any authenticated user may comment
pub fn can_create_comment(user: Option<&AuthUser>) -> Gate {
    match user {
        Some(_) => Gate::Allowed,
        None => Gate::Forbidden,
    }
}

/// Only the comment's author may update it
pub fn can_update_comment(user: Option<&AuthUser>, comment: &Comment) -> Gate {
    match user {
        Some(user) if user.user_id == comment.author_id => Gate::Allowed,
        _ => Gate::Forbidden,
    }
}
