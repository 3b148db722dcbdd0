//! Database layer - document store adapters and repositories
//!
//! # Design Principles
//!
//! - One `Store` handle per process, shared as `Arc<dyn Store>`
//! - Populate runs inside the store (`$lookup`) - no N+1 author lookups
//! - Rely on the unique index for email, handle the conflict - no check-then-insert
//! - Reads come back as cursors; callers decide whether to collect

pub mod error;
pub mod memory;
pub mod mongo;
pub mod monitor;
pub mod repos;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use futures::stream::BoxStream;

use crate::models::{NewPost, NewUser, Post, User};

pub use error::DbError;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use repos::*;

/// Collection holding user documents
pub const USERS: &str = "users";

/// Collection holding post documents
pub const POSTS: &str = "posts";

/// Forward-only cursor over raw documents
pub type DocumentStream = BoxStream<'static, Result<Document, DbError>>;

/// Document store backing the two collections.
///
/// Implementations assign ids, enforce email uniqueness and resolve
/// `posts.author` to `{ name }` when asked for populated posts.
#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), DbError>;

    async fn insert_user(&self, user: NewUser) -> Result<User, DbError>;

    async fn find_users(&self) -> Result<Vec<User>, DbError>;

    async fn insert_post(&self, post: NewPost) -> Result<Post, DbError>;

    async fn find_posts_by_author(&self, author: ObjectId) -> Result<Vec<Post>, DbError>;

    /// Cursor over posts with `author` replaced by `{ name }` (absent when the
    /// reference dangles), restricted to one `_id` when given.
    async fn populated_posts(&self, id: Option<ObjectId>) -> Result<DocumentStream, DbError>;

    /// Release backend resources. Called once after the server stops.
    async fn shutdown(&self);
}
