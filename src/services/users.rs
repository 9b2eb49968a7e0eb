//! User management service
//!
//! Sessions and sign-in live with an external collaborator; this service
//! only maintains the user documents other collections point at via the
//! Kennung.

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserContext},
    repository::{Doc, Repository},
    store::DocId,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a user. The Kennung must be free, it is the key everything
    /// else references.
    pub async fn create(&self, data: CreateUser) -> AppResult<DocId> {
        data.validate()?;
        if let Some(existing) = self.repository.users.find_by_kennung(&data.kennung).await? {
            return Err(AppError::Conflict(format!(
                "Kennung '{}' is already taken by {}",
                data.kennung, existing.data.name
            )));
        }
        let user = User {
            name: data.name,
            kennung: data.kennung,
            email: data.email,
            role: data.role.unwrap_or_default(),
            ..Default::default()
        };
        self.repository.users.create(&user).await
    }

    /// Get a user by document id
    pub async fn get(&self, id: &DocId) -> AppResult<Doc<User>> {
        self.repository.users.get(id).await
    }

    /// Look a user up by Kennung
    pub async fn find_by_kennung(&self, kennung: &str) -> AppResult<Option<Doc<User>>> {
        self.repository.users.find_by_kennung(kennung).await
    }

    /// Session context for a Kennung, for callers that resolve the
    /// signed-in user from the store instead of an external session
    pub async fn context_for(&self, kennung: &str) -> AppResult<UserContext> {
        let user = self
            .repository
            .users
            .find_by_kennung(kennung)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", kennung)))?;
        Ok(UserContext::from(&user.data))
    }

    /// Update name, email or role
    pub async fn update(&self, id: &DocId, data: UpdateUser) -> AppResult<()> {
        data.validate()?;
        // Existence check so a typo surfaces as NotFound
        self.repository.users.get(id).await?;
        self.repository.users.update(id, &data).await
    }

    /// List all users, sorted by name
    pub async fn list(&self) -> AppResult<Vec<Doc<User>>> {
        self.repository.users.list().await
    }

    /// Delete a user
    pub async fn delete(&self, id: &DocId) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
