//! Post repository
//!
//! Reads always go through the store's populate cursor, so the author is
//! reduced to `{ name }` before any caller sees it.

use bson::oid::ObjectId;
use bson::Document;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};

use crate::db::{DbError, Store};
use crate::models::{NewPost, PopulatedPost, Post};

/// Forward-only cursor over hydrated, populated posts
pub type PostStream = BoxStream<'static, Result<PopulatedPost, DbError>>;

/// Post repository
pub struct PostRepo<'a> {
    store: &'a dyn Store,
}

fn hydrate(doc: Document) -> Result<PopulatedPost, DbError> {
    Ok(bson::from_document(doc)?)
}

impl<'a> PostRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Insert a post, logging on either side of the write.
    ///
    /// The author reference is stored as given; it is not checked.
    pub async fn create(&self, post: NewPost) -> Result<Post, DbError> {
        tracing::info!(title = %post.title, "saving post");
        let post = self.store.insert_post(post).await?;
        tracing::info!(id = %post.id, title = %post.title, "saved post");
        Ok(post)
    }

    /// All posts, hydrated into typed records.
    pub async fn list(&self) -> Result<Vec<PopulatedPost>, DbError> {
        self.cursor().await?.try_collect().await
    }

    /// All posts as the raw documents the store returned.
    pub async fn list_lean(&self) -> Result<Vec<Document>, DbError> {
        self.store.populated_posts(None).await?.try_collect().await
    }

    pub async fn get(&self, id: ObjectId) -> Result<Option<PopulatedPost>, DbError> {
        let mut cursor = self.store.populated_posts(Some(id)).await?;
        cursor.try_next().await?.map(hydrate).transpose()
    }

    /// Posts whose author reference equals `author`. Not populated.
    pub async fn find_by_author(&self, author: ObjectId) -> Result<Vec<Post>, DbError> {
        self.store.find_posts_by_author(author).await
    }

    /// Cursor over every populated post, one document at a time.
    pub async fn cursor(&self) -> Result<PostStream, DbError> {
        let docs = self.store.populated_posts(None).await?;
        Ok(docs.and_then(|doc| async move { hydrate(doc) }).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::NewUser;

    async fn seeded() -> (MemoryStore, ObjectId, Post) {
        let store = MemoryStore::new();
        let ana = store
            .insert_user(NewUser::new(Some("Ana".into()), Some("ana@x.com".into())).unwrap())
            .await
            .unwrap();
        let post = PostRepo::new(&store)
            .create(NewPost {
                title: "Hi".into(),
                content: "World".into(),
                author: ana.id,
            })
            .await
            .unwrap();
        (store, ana.id, post)
    }

    #[tokio::test]
    async fn get_populates_author_name() {
        let (store, _, post) = seeded().await;
        let repo = PostRepo::new(&store);

        let found = repo.get(post.id).await.unwrap().expect("post exists");
        assert_eq!(found.title, "Hi");
        assert_eq!(found.author_name(), Some("Ana"));

        assert_eq!(repo.get(ObjectId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn lean_and_hydrated_agree() {
        let (store, _, post) = seeded().await;
        let repo = PostRepo::new(&store);

        let hydrated = repo.list().await.unwrap();
        let lean = repo.list_lean().await.unwrap();

        assert_eq!(hydrated.len(), 1);
        assert_eq!(lean.len(), 1);
        assert_eq!(lean[0].get_object_id("_id").unwrap(), post.id);
        assert_eq!(hydrated[0], hydrate(lean[0].clone()).unwrap());
    }

    #[tokio::test]
    async fn find_by_author_returns_unpopulated_posts() {
        let (store, author, post) = seeded().await;
        let repo = PostRepo::new(&store);

        let posts = repo.find_by_author(author).await.unwrap();
        assert_eq!(posts, vec![post]);
        assert!(repo.find_by_author(ObjectId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hydrate_rejects_malformed_documents() {
        let err = hydrate(bson::doc! { "title": 5 }).unwrap_err();
        assert!(matches!(err, DbError::Decode(_)));
    }
}
