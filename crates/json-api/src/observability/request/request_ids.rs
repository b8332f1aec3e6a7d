//! Request ID generation and response header helpers.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Keeps a caller-supplied id when it is short, printable ASCII; otherwise a
/// fresh one is generated.
pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    header_value
        .map(|value| value.trim().to_owned())
        .filter(|value| is_acceptable(value))
        .unwrap_or_else(generate_request_id)
}

fn is_acceptable(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|byte| byte.is_ascii_graphic())
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    let header_value = match HeaderValue::from_str(request_id) {
        Ok(value) => value,
        Err(source) => {
            warn!(
                request_id,
                "could not encode request id for response header: {source}"
            );

            return;
        }
    };

    res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
}

pub(super) fn response_status_or_ok(status_code: Option<StatusCode>) -> StatusCode {
    status_code.unwrap_or(StatusCode::OK)
}

fn generate_request_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_ids_are_trimmed_and_kept() {
        assert_eq!(resolve_request_id(Some(" abc-1 ".to_string())), "abc-1");
    }

    #[test]
    fn blank_or_oversized_ids_are_replaced() {
        let blank = resolve_request_id(Some("   ".to_string()));
        let oversized = resolve_request_id(Some("x".repeat(MAX_REQUEST_ID_LEN + 1)));

        assert!(Uuid::parse_str(&blank).is_ok(), "expected uuid, got {blank}");
        assert!(
            Uuid::parse_str(&oversized).is_ok(),
            "expected uuid, got {oversized}"
        );
    }

    #[test]
    fn ids_with_spaces_are_replaced() {
        let id = resolve_request_id(Some("two words".to_string()));

        assert!(Uuid::parse_str(&id).is_ok(), "expected uuid, got {id}");
    }
}
