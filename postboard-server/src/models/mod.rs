//! Domain models with validation at construction
//!
//! Request input is validated when building `NewUser` / `NewPost`.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod user;
pub mod post;

pub use validation::{parse_object_id, required, ValidationError};
pub use user::{NewUser, User};
pub use post::{AuthorName, NewPost, PopulatedPost, Post};
