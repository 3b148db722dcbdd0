//! MongoDB store
//!
//! Uses the official driver. The driver owns connection pooling; nothing here
//! tunes it.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use mongodb::event::EventHandler;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::monitor::ConnectionMonitor;
use super::{DbError, DocumentStream, Store, POSTS, USERS};
use crate::models::{NewPost, NewUser, Post, User};

/// Database used when neither the caller nor the URI names one
pub const DEFAULT_DATABASE: &str = "test";

/// Store backed by a MongoDB deployment
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect and ping the deployment.
    ///
    /// The driver connects lazily, so the ping is what turns an unreachable
    /// server into a startup error. Connection changes after startup are
    /// logged by a `ConnectionMonitor` attached to the client.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = MongoStore::connect("mongodb://localhost:27017/blog", None).await?;
    /// ```
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, DbError> {
        let mut options = ClientOptions::parse(uri).await?;
        let monitor = Arc::new(ConnectionMonitor::default());
        options.sdam_event_handler = Some(EventHandler::callback(move |event| {
            monitor.handle(event)
        }));

        let client = Client::with_options(options)?;
        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        let store = Self { client, db };
        store.ping().await?;
        tracing::info!(database = store.db.name(), "connected to MongoDB");
        Ok(store)
    }

    /// Create the unique email index and the author lookup index.
    ///
    /// Idempotent: MongoDB ignores an identical existing index.
    pub async fn ensure_indexes(&self) -> Result<(), DbError> {
        let email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(email).await?;

        let author = IndexModel::builder().keys(doc! { "author": 1 }).build();
        self.posts().create_index(author).await?;

        tracing::info!("indexes ensured on {} and {}", USERS, POSTS);
        Ok(())
    }

    #[cfg(test)]
    fn database(&self) -> &Database {
        &self.db
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn posts(&self) -> Collection<Post> {
        self.db.collection(POSTS)
    }
}

/// Aggregation that resolves `author` to `{ name }`.
///
/// `$unwind` keeps posts whose author is missing; the projection then drops
/// the empty `author` field entirely.
pub fn populate_author_pipeline(id: Option<ObjectId>) -> Vec<Document> {
    let mut pipeline = Vec::with_capacity(4);
    if let Some(id) = id {
        pipeline.push(doc! { "$match": { "_id": id } });
    }
    pipeline.extend([
        doc! {
            "$lookup": {
                "from": USERS,
                "localField": "author",
                "foreignField": "_id",
                "as": "author",
            }
        },
        doc! { "$unwind": { "path": "$author", "preserveNullAndEmptyArrays": true } },
        doc! { "$project": { "title": 1, "content": 1, "author.name": 1 } },
    ]);
    pipeline
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let user = user.into_user(ObjectId::new());
        self.users().insert_one(&user).await?;
        Ok(user)
    }

    async fn find_users(&self) -> Result<Vec<User>, DbError> {
        let users: Vec<User> = self.users().find(doc! {}).await?.try_collect().await?;
        Ok(users)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post, DbError> {
        let post = post.into_post(ObjectId::new());
        self.posts().insert_one(&post).await?;
        Ok(post)
    }

    async fn find_posts_by_author(&self, author: ObjectId) -> Result<Vec<Post>, DbError> {
        let posts: Vec<Post> = self
            .posts()
            .find(doc! { "author": author })
            .await?
            .try_collect()
            .await?;
        Ok(posts)
    }

    async fn populated_posts(&self, id: Option<ObjectId>) -> Result<DocumentStream, DbError> {
        let cursor = self
            .posts()
            .aggregate(populate_author_pipeline(id))
            .await?;
        Ok(cursor.map_err(DbError::from).boxed())
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}
