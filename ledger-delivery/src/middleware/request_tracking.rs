//! Request id generation, propagation and sensitive header masking

use http::{HeaderName, HeaderValue, Request};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use uuid::Uuid;

/// Prefix of generated request ids
pub const REQUEST_ID_PREFIX: &str = "req_";

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Generates `req_<uuidv7>` ids
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeLedgerRequestId;

impl MakeLedgerRequestId {
    /// A fresh request id string
    pub fn generate() -> String {
        format!("{REQUEST_ID_PREFIX}{}", Uuid::now_v7().simple())
    }
}

impl MakeRequestId for MakeLedgerRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let header_value = HeaderValue::from_str(&Self::generate()).ok()?;
        Some(RequestId::new(header_value))
    }
}

/// Sets `x-request-id` on requests that arrive without one
pub fn request_id_layer() -> SetRequestIdLayer<MakeLedgerRequestId> {
    SetRequestIdLayer::x_request_id(MakeLedgerRequestId)
}

/// Copies `x-request-id` from the request onto the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Masks [`SENSITIVE_HEADERS`] in request logs
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .map(|name| HeaderName::from_static(name))
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let first = MakeLedgerRequestId::generate();
        let second = MakeLedgerRequestId::generate();
        assert!(first.starts_with(REQUEST_ID_PREFIX));
        assert_eq!(first.len(), REQUEST_ID_PREFIX.len() + 32);
        assert_ne!(first, second);
    }

    #[test]
    fn test_make_request_id() {
        let request = Request::builder().body(()).unwrap();
        let id = MakeLedgerRequestId.make_request_id(&request).unwrap();
        assert!(id.header_value().to_str().unwrap().starts_with("req_"));
    }

    #[test]
    fn test_sensitive_headers_constant() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(SENSITIVE_HEADERS.contains(&"x-api-key"));
    }
}
