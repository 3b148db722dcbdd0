//! Repositories over the document store
//!
//! Each repository borrows the process-wide `Store`:
//! - users: create with unique email, list
//! - posts: create with persistence logging, populated reads, export cursor

pub mod users;
pub mod posts;

pub use users::UserRepo;
pub use posts::{PostRepo, PostStream};
