//! Post endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::db::PostRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, QueryParams, ValidObjectId};
use crate::http::server::AppState;
use crate::models::{AuthorName, NewPost, PopulatedPost, Post};

/// Create post request
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Author's user id (hex ObjectId)
    pub author: Option<String>,
}

/// Query parameters for GET /posts
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsParams {
    pub lean: Option<String>,
}

impl ListPostsParams {
    /// Only the literal `true` enables lean mode.
    pub fn is_lean(&self) -> bool {
        self.lean.as_deref() == Some("true")
    }
}

/// Stored post response (author as raw id)
#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id.to_hex(),
            title: p.title,
            content: p.content,
            author: p.author.to_hex(),
        }
    }
}

/// Populated post response (author as `{ name }`, null when unresolved)
#[derive(Debug, Serialize)]
pub struct PopulatedPostResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: Option<AuthorName>,
}

impl From<PopulatedPost> for PopulatedPostResponse {
    fn from(p: PopulatedPost) -> Self {
        Self {
            id: p.id.to_hex(),
            title: p.title,
            content: p.content,
            author: p.author,
        }
    }
}

/// GET /posts body: hydrated records, or the store's documents as-is
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PostListResponse {
    Hydrated(Vec<PopulatedPostResponse>),
    Lean(Vec<serde_json::Value>),
}

fn lean_json(doc: Document) -> serde_json::Value {
    Bson::Document(doc).into_relaxed_extjson()
}

/// GET /posts - list posts with author names, `?lean=true` for raw documents
async fn list_posts(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ListPostsParams>,
) -> Result<Json<PostListResponse>, ApiError> {
    let repo = PostRepo::new(state.store.as_ref());

    let body = if params.is_lean() {
        let docs = repo.list_lean().await.map_err(ApiError::bad_request)?;
        PostListResponse::Lean(docs.into_iter().map(lean_json).collect())
    } else {
        let posts = repo.list().await.map_err(ApiError::bad_request)?;
        PostListResponse::Hydrated(posts.into_iter().map(PopulatedPostResponse::from).collect())
    };

    Ok(Json(body))
}

/// GET /posts/{id} - single post with author name
async fn get_post(
    State(state): State<Arc<AppState>>,
    ValidObjectId(id): ValidObjectId,
) -> Result<Json<PopulatedPostResponse>, ApiError> {
    let post = PostRepo::new(state.store.as_ref())
        .get(id)
        .await
        .map_err(ApiError::bad_request)?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Post",
            id: id.to_hex(),
        })?;

    Ok(Json(PopulatedPostResponse::from(post)))
}

/// POST /posts - create a post; the author reference is not checked
async fn create_post(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = NewPost::new(req.title, req.content, req.author)?;
    let post = PostRepo::new(state.store.as_ref())
        .create(post)
        .await
        .map_err(ApiError::bad_request)?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post))
}
