use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{error, warn};
use uuid::Uuid;

use super::services::resolve_user;
use crate::{error::RpcError, state::AppState};

/// The authenticated caller's internal user id.
///
/// Extracting it runs the whole auth pipeline: bearer token, JWT
/// verification, then user lookup or first-time creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = RpcError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = state.jwt.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            RpcError::unauthenticated("invalid or expired token")
        })?;

        let user = resolve_user(state.users.as_ref(), &claims.sub)
            .await
            .map_err(|e| {
                error!(error = %e, "resolve user failed");
                RpcError::internal()
            })?;

        Ok(AuthUser(user.id))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, RpcError> {
    let auth = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| RpcError::unauthenticated("missing Authorization header"))?
        .to_str()
        .map_err(|_| RpcError::unauthenticated("invalid Authorization header"))?;

    let (scheme, token) = auth
        .split_once(' ')
        .ok_or_else(|| RpcError::unauthenticated("invalid Authorization header"))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(RpcError::unauthenticated("invalid auth scheme"));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[rstest]
    #[case("Bearer abc.def.ghi", "abc.def.ghi")]
    #[case("bearer abc", "abc")]
    #[case("BEARER   abc  ", "abc")]
    fn accepts_bearer_scheme(#[case] header: &str, #[case] token: &str) {
        let h = headers(header);
        assert_eq!(bearer_token(&h).unwrap(), token);
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Bearer")]
    #[case("Bearer    ")]
    #[case("abc.def.ghi")]
    fn rejects_malformed_header(#[case] header: &str) {
        let err = bearer_token(&headers(header)).unwrap_err();
        assert_eq!(err.code, crate::error::Code::Unauthenticated);
    }

    #[test]
    fn rejects_missing_header() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.message, "missing Authorization header");
    }
}
