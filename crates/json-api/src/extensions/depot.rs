//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use shopfront_app::{
    auth::Principal,
    domain::owners::{Owner, UserUuid},
};

use crate::auth::Identity;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_identity(&mut self, identity: Identity);

    fn identity_or_500(&self) -> Result<&Identity, StatusError>;

    /// The cart/order owner of the request: the signed-in user, else the
    /// guest session.
    fn owner_or_400(&self) -> Result<Owner, StatusError>;

    fn user_or_401(&self) -> Result<UserUuid, StatusError>;

    fn admin_or_403(&self) -> Result<Principal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity_or_500(&self) -> Result<&Identity, StatusError> {
        self.obtain_or_500::<Identity>()
    }

    fn owner_or_400(&self) -> Result<Owner, StatusError> {
        self.identity_or_500()?.owner().map_err(|error| {
            StatusError::bad_request()
                .brief("owner_required")
                .cause(error.to_string())
        })
    }

    fn user_or_401(&self) -> Result<UserUuid, StatusError> {
        self.identity_or_500()?
            .principal
            .map(|principal| principal.user)
            .ok_or_else(|| StatusError::unauthorized().brief("Missing or invalid Authorization header"))
    }

    fn admin_or_403(&self) -> Result<Principal, StatusError> {
        let Some(principal) = self.identity_or_500()?.principal else {
            return Err(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        };

        if !principal.is_admin {
            return Err(StatusError::forbidden().brief("Administrator token required"));
        }

        Ok(principal)
    }
}
