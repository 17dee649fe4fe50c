use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID wrapper type, available to handlers via extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tag every request with a fresh ID and echo it on the response, so a
/// failed synthesis job or media fetch can be correlated across logs.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    tracing::debug!(request_id = %request_id, path = %request.uri().path(), "Request received");

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, header_value);
    }

    response
}
