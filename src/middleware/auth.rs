use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{AuthError, JwtKeys, Role};
use crate::error::ApiError;
use crate::messages::Message;
use crate::state::AppState;

/// Authenticated caller derived from the token claims
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

/// Per-request context produced by the auth step. Inserted once, never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }
}

/// Verify the bearer token in `headers` and return the caller it names.
pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<Identity, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = keys.verify(token)?;
    Ok(Identity {
        username: claims.sub,
        role: claims.role,
    })
}

/// Extract JWT token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    // Scheme names are case-insensitive
    let (scheme, token) = auth_str
        .trim_start()
        .split_once(' ')
        .ok_or(AuthError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }
    let token = token.trim();

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}

/// Rejects the request with an empty 401 unless it carries a valid token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.keys) {
        Ok(identity) => {
            request
                .extensions_mut()
                .insert(RequestContext::authenticated(identity));
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Rejected request to {}: {}", request.uri().path(), e);
            ApiError::Unauthorized.into_response()
        }
    }
}

/// Same verification, but the request always goes through; identity is set iff the token was valid.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = match authenticate(request.headers(), &state.keys) {
        Ok(identity) => RequestContext::authenticated(identity),
        Err(AuthError::MissingHeader) => RequestContext::anonymous(),
        Err(e) => {
            tracing::debug!("Ignoring bad token on {}: {}", request.uri().path(), e);
            RequestContext::anonymous()
        }
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Admin routes: role claim must be admin and the admin row must still exist.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = identity_of(&request)?;
    if identity.role != Role::Admin {
        tracing::warn!("Non-admin '{}' tried {}", identity.username, request.uri().path());
        return Err(ApiError::forbidden(Message::AdminOnly));
    }

    if state.store.find_admin(&identity.username).await?.is_none() {
        tracing::warn!("Admin token for unknown admin '{}'", identity.username);
        return Err(ApiError::forbidden(Message::AdminOnly));
    }

    Ok(next.run(request).await)
}

/// Member routes: role claim must be member.
pub async fn require_member(request: Request, next: Next) -> Result<Response, ApiError> {
    let identity = identity_of(&request)?;
    if identity.role != Role::Member {
        return Err(ApiError::forbidden(Message::MembersOnly));
    }
    Ok(next.run(request).await)
}

fn identity_of(request: &Request) -> Result<Identity, ApiError> {
    request
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.identity.clone())
        .ok_or(ApiError::Unauthorized)
}

/// Handlers behind `optional_auth_middleware` take the whole context.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Handlers behind `auth_middleware` take the identity directly.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.identity.clone())
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn valid_token_yields_subject() {
        let keys = JwtKeys::new("secret", 1);
        let token = keys.issue("alice", Role::Member).unwrap();

        let identity = authenticate(&headers_with(&format!("Bearer {token}")), &keys).unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::Member);
    }

    #[test]
    fn missing_or_malformed_headers_fail() {
        let keys = JwtKeys::new("secret", 1);
        let token = keys.issue("alice", Role::Member).unwrap();

        assert!(matches!(
            authenticate(&HeaderMap::new(), &keys),
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            authenticate(&headers_with(&format!("Token {token}")), &keys),
            Err(AuthError::InvalidScheme)
        ));
        assert!(matches!(
            authenticate(&headers_with("Bearer   "), &keys),
            Err(AuthError::EmptyToken)
        ));
        assert!(matches!(
            authenticate(&headers_with("Bearer abc.def.ghi"), &keys),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let keys = JwtKeys::new("secret", 1);
        let token = keys.issue("alice", Role::Member).unwrap();

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let identity = authenticate(&headers_with(&format!("{scheme} {token}")), &keys).unwrap();
            assert_eq!(identity.username, "alice");
        }
        assert!(matches!(
            authenticate(&headers_with(&format!("Bearer{token}")), &keys),
            Err(AuthError::InvalidScheme)
        ));
    }
}
