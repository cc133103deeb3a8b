//! Request ID resolution and response header helpers.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse a caller supplied id when it is short printable ASCII, otherwise mint one.
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
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => {
            warn!(request_id, "could not encode request id header: {source}");
        }
    }
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
    fn caller_supplied_id_is_kept() {
        assert_eq!(
            resolve_request_id(Some(" checkout-42 ".to_owned())),
            "checkout-42"
        );
    }

    #[test]
    fn blank_or_oversized_ids_are_replaced() {
        for value in [String::new(), "   ".to_owned(), "x".repeat(MAX_REQUEST_ID_LEN + 1)] {
            let resolved = resolve_request_id(Some(value.clone()));

            assert_ne!(resolved, value.trim(), "{value:?} should be replaced");
            assert!(Uuid::parse_str(&resolved).is_ok(), "expected a generated uuid");
        }
    }

    #[test]
    fn ids_with_whitespace_inside_are_replaced() {
        let resolved = resolve_request_id(Some("two words".to_owned()));

        assert!(Uuid::parse_str(&resolved).is_ok(), "expected a generated uuid");
    }

    #[test]
    fn unset_status_reads_as_ok() {
        assert_eq!(response_status_or_ok(None), StatusCode::OK);
        assert_eq!(
            response_status_or_ok(Some(StatusCode::CONFLICT)),
            StatusCode::CONFLICT
        );
    }
}
