//! Who a cart or an order belongs to.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::uuids::TypedUuid;

/// Maximum length of a guest session identifier.
pub const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct User;

pub type UserUuid = TypedUuid<User>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSessionId {
    #[error("session id must not be empty")]
    Empty,

    #[error("session id must be at most {MAX_SESSION_ID_LEN} characters")]
    TooLong,
}

/// Opaque identifier of an anonymous browsing session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// # Errors
    ///
    /// Returns an error when the value is blank or longer than [`MAX_SESSION_ID_LEN`].
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidSessionId> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(InvalidSessionId::Empty);
        }

        if value.chars().count() > MAX_SESSION_ID_LEN {
            return Err(InvalidSessionId::TooLong);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Neither a user nor a session was supplied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("a user or a session is required")]
pub struct OwnerRequired;

/// Exactly one owner: a signed-in user or a guest session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    User(UserUuid),
    Session(SessionId),
}

impl Owner {
    /// Resolves the owner of a request. A signed-in user wins over a session.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerRequired`] when neither is present.
    pub fn resolve(
        user: Option<UserUuid>,
        session: Option<SessionId>,
    ) -> Result<Self, OwnerRequired> {
        match (user, session) {
            (Some(user), _) => Ok(Self::User(user)),
            (None, Some(session)) => Ok(Self::Session(session)),
            (None, None) => Err(OwnerRequired),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<UserUuid> {
        match self {
            Self::User(user) => Some(*user),
            Self::Session(_) => None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionId> {
        match self {
            Self::User(_) => None,
            Self::Session(session) => Some(session),
        }
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::User(user) => write!(f, "user:{user}"),
            Self::Session(session) => write!(f, "session:{session}"),
        }
    }
}
