use derive_more::{AsRef, Deref, Display};
use uuid::Uuid;

use crate::CreateError;

#[allow(async_fn_in_trait)]
pub trait UserRepository {
    async fn create_user(&self, username: Username, password: Password)
    -> Result<User, CreateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub username: Username,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(username: &str) -> Result<Self, UsernameError> {
        let trimmed = username.trim();

        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(UsernameError::Whitespace);
        }

        let len = trimmed.chars().count();

        if len > 64 {
            return Err(UsernameError::TooLong(len));
        }

        Ok(Self(trimmed.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
    #[error("Username must not contain whitespace")]
    Whitespace,
    #[error("Username must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}

/// Plain-text password as entered by the user. The value is never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LEN: usize = 6;

    pub fn new(password: &str) -> Result<Self, PasswordError> {
        let len = password.chars().count();

        if len < Self::MIN_LEN {
            return Err(PasswordError::TooShort(len));
        }

        Ok(Self(password.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PasswordError {
    #[error("Password must be at least 6 characters ({0} < 6)")]
    TooShort(usize),
}
