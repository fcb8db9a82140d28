//! HTTP Basic authentication.
//!
//! The [`authenticate`] middleware verifies credentials when a request
//! carries them and records the user as a request extension. Handlers pick
//! the policy: [`Principal`] demands a user, [`MaybePrincipal`] accepts
//! anonymous callers.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use liftlog::db::models::User;
use log::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Parses an `Authorization: Basic ...` value.
pub fn parse_basic(value: &str) -> Option<Credentials> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// `Ok(None)` when no credentials were sent, `Err` when they were sent and
/// do not check out.
async fn principal_from_headers(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let credentials = value
        .to_str()
        .ok()
        .and_then(parse_basic)
        .ok_or(ApiError::Unauthorized)?;
    state
        .identity
        .authenticate(&credentials.username, &credentials.password)
        .await?
        .map(Some)
        .ok_or(ApiError::Unauthorized)
}

pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match principal_from_headers(&state, request.headers()).await {
        Ok(Some(user)) => {
            debug!("authenticated {}", user.username);
            request.extensions_mut().insert(Principal(user));
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// The authenticated caller. Rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct Principal(pub User);

impl Principal {
    pub fn name(&self) -> &str {
        &self.0.username
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// The caller if one authenticated, for routes open to everyone.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

impl MaybePrincipal {
    pub fn name(&self) -> Option<&str> {
        self.0.as_ref().map(Principal::name)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_credentials() {
        let value = format!("Basic {}", STANDARD.encode("alice:s3cr:et"));
        assert_eq!(
            parse_basic(&value),
            Some(Credentials {
                username: "alice".into(),
                password: "s3cr:et".into(),
            })
        );
        let lower = format!("basic {}", STANDARD.encode("bob:pw"));
        assert_eq!(parse_basic(&lower).map(|c| c.username), Some("bob".into()));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!not-base64"), None);
        assert_eq!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
        assert_eq!(parse_basic("Basic"), None);
    }
}
