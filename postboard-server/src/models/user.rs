//! User records

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{required, ValidationError};

/// Stored user document (`users` collection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
}

/// Validated input for a new user.
///
/// Email uniqueness is not checked here; the store's unique index owns that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: Option<String>, email: Option<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", name)?,
            email: required("email", email)?,
        })
    }

    /// Attach a store-assigned id.
    pub fn into_user(self, id: ObjectId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_complete_input() {
        let user = NewUser::new(Some("Ana".into()), Some("ana@x.com".into())).unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@x.com");
    }

    #[test]
    fn name_checked_before_email() {
        let err = NewUser::new(None, None).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "name" });

        let err = NewUser::new(Some("Ana".into()), Some(String::new())).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "email" });
    }

    #[test]
    fn stored_shape_uses_underscore_id() {
        let id = ObjectId::new();
        let user = NewUser::new(Some("Ana".into()), Some("ana@x.com".into()))
            .unwrap()
            .into_user(id);
        let doc = bson::to_document(&user).unwrap();
        assert_eq!(doc.get_object_id("_id").unwrap(), id);
        assert_eq!(doc.get_str("email").unwrap(), "ana@x.com");
    }
}
