use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};

use crate::error::ErrorDetails;

/// Logs one line per request and stamps the request path into error bodies.
pub async fn request_context(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed = started.elapsed();

    let response = match response.extensions().get::<ErrorDetails>().cloned() {
        Some(details) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(CONTENT_LENGTH);
            match serde_json::to_vec(&details.body(&path)) {
                Ok(bytes) => Response::from_parts(parts, Body::from(bytes)),
                Err(e) => {
                    warn!("failed to render error body: {}", e);
                    Response::from_parts(parts, Body::empty())
                }
            }
        }
        None => response,
    };

    if status.is_client_error() || status.is_server_error() {
        warn!("{} {} -> {} ({:?})", method, path, status.as_u16(), elapsed);
    } else {
        info!("{} {} -> {} ({:?})", method, path, status.as_u16(), elapsed);
    }
    response
}
