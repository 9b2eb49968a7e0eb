//! User model and the session user context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::enums::Role;

/// User document (`users` collection)
///
/// The Kennung is the de facto foreign key for users everywhere else in
/// the store; the document id is never referenced from other collections.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub kennung: String,
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create user payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 3, message = "Kennung must be at least 3 characters"))]
    pub kennung: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Update user payload. The Kennung is absent on purpose: it is the key
/// every other collection stores, so changing it would orphan those
/// references.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// The signed-in user as handed over by the session collaborator. Every
/// lifecycle call takes one of these for attribution; nothing in here is
/// an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub name: String,
    pub kennung: String,
    pub is_admin: bool,
}

impl UserContext {
    pub fn new(name: impl Into<String>, kennung: impl Into<String>, is_admin: bool) -> Self {
        UserContext {
            name: name.into(),
            kennung: kennung.into(),
            is_admin,
        }
    }
}

impl From<&User> for UserContext {
    fn from(user: &User) -> Self {
        UserContext {
            name: user.name.clone(),
            kennung: user.kennung.clone(),
            is_admin: user.role == Role::Admin,
        }
    }
}
