//! Request identity: bearer tokens for users and a header for guest sessions.

mod identity;
pub(crate) mod middleware;

pub(crate) use identity::*;
