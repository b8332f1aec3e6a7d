//! Auth data models.

use jiff::Timestamp;

use crate::{domain::owners::UserUuid, uuids::TypedUuid};

/// User Token UUID
pub type UserTokenUuid = TypedUuid<UserToken>;

/// The authenticated caller behind a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user: UserUuid,
    pub is_admin: bool,
}

/// Token metadata persisted in storage. The raw token is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserToken {
    pub uuid: UserTokenUuid,
    pub user_uuid: UserUuid,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// New token persistence payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserToken {
    pub uuid: UserTokenUuid,
    pub user_uuid: UserUuid,
    pub is_admin: bool,
    pub token_hash: String,
}

/// Token issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub metadata: UserToken,
}
