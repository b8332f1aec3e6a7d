//! Request identity.

use shopfront_app::{
    auth::Principal,
    domain::owners::{Owner, OwnerRequired, SessionId},
};

/// Header carrying the guest session identifier.
pub(crate) const SESSION_ID_HEADER: &str = "x-session-id";

/// Who is calling. Either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) principal: Option<Principal>,
    pub(crate) session: Option<SessionId>,
}

impl Identity {
    pub(crate) fn owner(&self) -> Result<Owner, OwnerRequired> {
        Owner::resolve(
            self.principal.map(|principal| principal.user),
            self.session.clone(),
        )
    }
}
