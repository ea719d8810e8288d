pub mod category;
pub mod comment;
pub mod post;
pub mod tag;
pub mod user;

pub use category::Category;
pub use comment::Comment;
pub use post::Post;
pub use tag::Tag;
pub use user::User;
