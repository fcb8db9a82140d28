use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use liftlog::LiftlogError;
use log::error;
use serde::Serialize;

pub const AUTH_REALM: &str = r#"Basic realm="liftlog""#;

#[derive(Debug)]
pub enum ApiError {
    Core(LiftlogError),
    Unauthorized,
    BadRequest(String),
    NoRoute,
}

impl From<LiftlogError> for ApiError {
    fn from(e: LiftlogError) -> Self {
        ApiError::Core(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                LiftlogError::Invalid(_) => StatusCode::BAD_REQUEST,
                LiftlogError::NotFound(_) => StatusCode::NOT_FOUND,
                LiftlogError::Forbidden(_) => StatusCode::FORBIDDEN,
                LiftlogError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NoRoute => StatusCode::NOT_FOUND,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Core(e) => e.message().to_string(),
            ApiError::Unauthorized => "authentication required".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::NoRoute => "no such route".to_string(),
        }
    }
}

/// Error details carried on the response until the request path is known.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorDetails {
    pub fn body(&self, path: &str) -> ErrorBody {
        ErrorBody {
            timestamp: Utc::now().to_rfc3339(),
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message.clone(),
            path: path.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = ErrorDetails {
            status: self.status(),
            message: self.message(),
        };
        if details.status.is_server_error() {
            error!("request failed: {}", details.message);
        }

        let mut response = (details.status, Json(details.body(""))).into_response();
        if matches!(self, ApiError::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
        }
        response.extensions_mut().insert(details);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (LiftlogError::invalid("x"), StatusCode::BAD_REQUEST),
            (LiftlogError::not_found("x"), StatusCode::NOT_FOUND),
            (LiftlogError::access_denied(), StatusCode::FORBIDDEN),
            (LiftlogError::conflict("x"), StatusCode::CONFLICT),
            (LiftlogError::with_display("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            AUTH_REALM
        );
        assert!(response.extensions().get::<ErrorDetails>().is_some());
    }

    #[test]
    fn body_uses_reason_phrase() {
        let details = ErrorDetails {
            status: StatusCode::FORBIDDEN,
            message: "not found or access denied".into(),
        };
        let body = details.body("/api/v1/session-logs/1");
        assert_eq!(body.status, 403);
        assert_eq!(body.error, "Forbidden");
        assert_eq!(body.path, "/api/v1/session-logs/1");
    }
}
