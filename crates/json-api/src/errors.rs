//! Shared pieces of the error mapping.

use std::fmt::Display;

use salvo::http::StatusError;

/// A client-facing error: `brief` names the failure kind, `cause` explains it.
pub(crate) fn rejected(status: StatusError, brief: &str, error: &impl Display) -> StatusError {
    status.brief(brief).cause(error.to_string())
}
