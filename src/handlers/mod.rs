pub mod comments;
pub mod context;
pub mod create;
pub mod detail;
pub mod list;
pub mod update;
