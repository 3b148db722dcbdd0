//! Store error type

use mongodb::error::{ErrorKind, WriteFailure};

/// MongoDB server code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Mongo(mongodb::error::Error),

    /// Unique index rejected the write. Carries the server's message verbatim.
    #[error("{message}")]
    DuplicateKey { message: String },

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
}

impl From<mongodb::error::Error> for DbError {
    fn from(e: mongodb::error::Error) -> Self {
        if let ErrorKind::Write(WriteFailure::WriteError(write)) = e.kind.as_ref() {
            if write.code == DUPLICATE_KEY_CODE {
                return Self::DuplicateKey {
                    message: write.message.clone(),
                };
            }
        }
        Self::Mongo(e)
    }
}

impl DbError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}
