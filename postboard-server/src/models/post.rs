//! Post records and their populated (author-resolved) form

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{parse_object_id, required, ValidationError};

/// Stored post document (`posts` collection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    /// Reference to `users._id`. Never checked for existence.
    pub author: ObjectId,
}

impl Post {
    /// One-line summary using the raw author reference.
    pub fn info(&self) -> String {
        format!("Post Title: {}, Author: {}", self.title, self.author)
    }
}

/// Validated input for a new post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: ObjectId,
}

impl NewPost {
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        author: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = required("title", title)?;
        let content = required("content", content)?;
        let author = required("author", author)?;

        Ok(Self {
            title,
            content,
            author: parse_object_id("author", &author)?,
        })
    }

    /// Attach a store-assigned id.
    pub fn into_post(self, id: ObjectId) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author: self.author,
        }
    }
}

/// Author projection used when populating posts: name only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    pub name: String,
}

/// Post with `author` resolved to `{ name }`.
///
/// `author` is `None` when the reference points at a user that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedPost {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<AuthorName>,
}

impl PopulatedPost {
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.name.as_str())
    }
}
