//! Request ID propagation for log correlation

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::error::ErrorResponse;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layers that assign a UUID v4 request ID when the caller sent none,
/// and echo it back on the response.
pub fn request_id_layer() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    let header_name = HeaderName::from_static(X_REQUEST_ID);

    (
        SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid),
        PropagateRequestIdLayer::new(header_name),
    )
}

pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> Option<&str> {
        self.get(X_REQUEST_ID)?.to_str().ok()
    }
}

/// Copy the request ID into JSON error bodies
pub async fn stamp_error_request_id(request: Request, next: Next) -> Response {
    let request_id = request.headers().request_id().map(str::to_owned);
    let mut response = next.run(request).await;

    let Some(body) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };
    match request_id {
        Some(id) => ErrorResponse {
            request_id: Some(id),
            ..body
        }
        .into_response_with(response.status()),
        None => response,
    }
}
