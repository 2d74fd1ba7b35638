//! User model for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// User account stored in Firestore.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Lowercased username (also used as document ID)
    pub id: String,
    /// Username as entered at registration
    pub username: String,
    pub email: String,
    /// Argon2 PHC hash string, never sent to clients
    pub password_hash: String,
    /// When the account was created
    pub created_at: String,
}

impl User {
    /// Document id for a username. Usernames are unique case-insensitively.
    pub fn id_for(username: &str) -> String {
        username.trim().to_lowercase()
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// User as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Registration request body.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct Registration {
    #[validate(
        length(min = 3, max = 20),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email, length(max = 50))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

impl Registration {
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login request body.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    /// Session JWT, also set as the `pin_token` cookie
    pub token: String,
    pub user: PublicUser,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars"))
    }
}
