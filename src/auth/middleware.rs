use crate::{error::AuthError, AppState};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The header must split on single spaces into exactly two parts, the first
/// being `Bearer`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorizationHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    let parts: Vec<&str> = auth_header.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(token),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}

pub async fn require_bearer_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer_token(&headers).inspect_err(|err| {
        tracing::warn!(path = %request.uri().path(), "Rejected request: {}", err);
    })?;

    let claims = state.token_service.verify(token).map_err(|_| {
        tracing::warn!(path = %request.uri().path(), "Rejected request: invalid token");
        AuthError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        username: claims.username,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingAuthorizationHeader)
        ));
    }

    #[test]
    fn test_well_formed_header() {
        let headers = headers("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_malformed_headers() {
        for value in ["Token abc", "Bearer", "bearer abc", "Bearer a b", "Bearer  abc"] {
            let headers = headers(value);
            assert!(
                matches!(
                    extract_bearer_token(&headers),
                    Err(AuthError::InvalidAuthorizationFormat)
                ),
                "expected {value:?} to be rejected"
            );
        }
    }
}
