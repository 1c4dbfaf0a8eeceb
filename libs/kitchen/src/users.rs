//! Identity lookups and account creation

use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, User};
use crate::{DomainError, DomainResult, Kitchen};

impl Kitchen {
    /// Persist a new user. The password must already be hashed.
    pub async fn create_user(&self, new_user: &NewUser) -> DomainResult<User> {
        let user = self.store.insert_user(new_user).await?;
        info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> DomainResult<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    pub async fn get_user_by_username(&self, username: &str) -> DomainResult<User> {
        self.store
            .get_user_by_username(username)
            .await?
            .ok_or(DomainError::UserNotFound)
    }
}
