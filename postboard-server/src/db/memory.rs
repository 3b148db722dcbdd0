//! In-process store
//!
//! Same observable behavior as `MongoStore`: store-assigned ids, a unique
//! email constraint, name-only author population and insertion-ordered
//! cursors. State lives for the lifetime of the value.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::{self, StreamExt};
use tokio::sync::RwLock;

use super::{DbError, DocumentStream, Store, USERS};
use crate::models::{NewPost, NewUser, Post, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    posts: Vec<Post>,
}

/// Store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn populate(post: &Post, users: &[User]) -> Document {
    let mut doc = doc! {
        "_id": post.id,
        "title": post.title.as_str(),
        "content": post.content.as_str(),
    };
    if let Some(user) = users.iter().find(|u| u.id == post.author) {
        doc.insert("author", doc! { "name": user.name.as_str() });
    }
    doc
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(DbError::DuplicateKey {
                message: format!(
                    "E11000 duplicate key error collection: {} index: email_1 dup key: {{ email: \"{}\" }}",
                    USERS, user.email
                ),
            });
        }

        let user = user.into_user(ObjectId::new());
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_users(&self) -> Result<Vec<User>, DbError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post, DbError> {
        let post = post.into_post(ObjectId::new());
        self.inner.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn find_posts_by_author(&self, author: ObjectId) -> Result<Vec<Post>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.author == author)
            .cloned()
            .collect())
    }

    async fn populated_posts(&self, id: Option<ObjectId>) -> Result<DocumentStream, DbError> {
        // Snapshot under the lock so the cursor does not hold it across awaits.
        let inner = self.inner.read().await;
        let docs: Vec<Document> = inner
            .posts
            .iter()
            .filter(|p| id.map_or(true, |id| p.id == id))
            .map(|p| populate(p, &inner.users))
            .collect();

        Ok(stream::iter(docs.into_iter().map(Ok)).boxed())
    }

    async fn shutdown(&self) {}
}
