use serde::{Deserialize, Serialize};

use crate::app::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub handle: String,
    pub email: String,
    /// Stored as entered; the `users` document shape requires it.
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

/// The `currentUser` document: a copy of one `users` row plus the login marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "isLoggedIn", default)]
    pub is_logged_in: bool,
    #[serde(flatten)]
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            is_logged_in: true,
            user,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Author fields copied into another document at write time. Never refreshed
/// when the author later edits their profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSnapshot {
    pub id: String,
    pub username: String,
    pub handle: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl From<&User> for AuthorSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            handle: user.handle.clone(),
            profile_image: user.profile_image.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Username,
    Handle,
    Email,
}

impl ProfileField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Handle => "Handle",
            Self::Email => "Email",
        }
    }

    pub fn validate(&self, value: &str) -> AppResult<()> {
        if value.trim().is_empty() {
            return Err(AppError::validation("Field cannot be empty!"));
        }
        match self {
            Self::Handle if !value.starts_with('@') => {
                Err(AppError::validation("Handle must start with @"))
            }
            Self::Email if !value.contains('@') => {
                Err(AppError::validation("Please enter a valid email address"))
            }
            _ => Ok(()),
        }
    }

    pub fn apply(&self, user: &mut User, value: String) {
        match self {
            Self::Username => user.username = value,
            Self::Handle => user.handle = value,
            Self::Email => user.email = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Profile,
    Cover,
}

impl ImageSlot {
    pub fn apply(&self, user: &mut User, uri: Option<String>) {
        match self {
            Self::Profile => user.profile_image = uri,
            Self::Cover => user.cover_image = uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_document_shape() {
        let raw = json!({
            "isLoggedIn": true,
            "id": "42",
            "username": "ann",
            "handle": "@ann",
            "email": "ann@example.com",
            "password": "secret1",
            "profileImage": null
        });
        let session: Session = serde_json::from_value(raw).unwrap();
        assert!(session.is_logged_in);
        assert_eq!(session.user_id(), "42");
        assert_eq!(session.user.role, "user");
        assert!(!session.user.banned);

        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back["isLoggedIn"], json!(true));
        assert_eq!(back["coverImage"], json!(null));
        assert_eq!(back["username"], json!("ann"));
    }

    #[test]
    fn field_rules() {
        assert!(ProfileField::Handle.validate("ann").is_err());
        assert!(ProfileField::Handle.validate("@ann").is_ok());
        assert!(ProfileField::Email.validate("ann.example.com").is_err());
        assert!(ProfileField::Username.validate("   ").is_err());
    }
}
