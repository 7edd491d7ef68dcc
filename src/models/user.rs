//! User model
//!
//! Users are identities only; credentials and sessions live outside this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

pub const USER_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display/login name, unique case-insensitively
    pub name: String,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: name.into(),
            email: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_email(name: impl Into<String>, email: impl Into<String>) -> Self {
        let mut user = Self::new(name);
        user.email = Some(email.into());
        user
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        if name.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(UserValidationError::NameTooLong(name.chars().count()));
        }

        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(UserValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidEmail(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "User name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "User name too long ({} chars, max {})",
                len, USER_NAME_MAX_LENGTH
            ),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for UserValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = User::new("alice");
        assert_eq!(user.name, "alice");
        assert!(user.email.is_none());
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut user = User::new("  ");
        assert_eq!(user.validate(), Err(UserValidationError::EmptyName));

        user.name = "a".repeat(51);
        assert!(matches!(
            user.validate(),
            Err(UserValidationError::NameTooLong(51))
        ));

        let user = User::with_email("bob", "not-an-email");
        assert!(matches!(
            user.validate(),
            Err(UserValidationError::InvalidEmail(_))
        ));
    }
}
