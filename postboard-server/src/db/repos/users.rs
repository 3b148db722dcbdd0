//! User repository

use crate::db::{DbError, Store};
use crate::models::{NewUser, User};

/// User repository
pub struct UserRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> UserRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Insert a user. A taken email surfaces as `DbError::DuplicateKey`.
    pub async fn create(&self, user: NewUser) -> Result<User, DbError> {
        let user = self.store.insert_user(user).await?;
        tracing::debug!(id = %user.id, "created user");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        self.store.find_users().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn create_then_list() {
        let store = MemoryStore::new();
        let repo = UserRepo::new(&store);

        let ana = repo
            .create(NewUser::new(Some("Ana".into()), Some("ana@x.com".into())).unwrap())
            .await
            .unwrap();

        assert_eq!(repo.list().await.unwrap(), vec![ana]);
    }
}
