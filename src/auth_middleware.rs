use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::warn;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Verifies a bearer token when one is sent and stashes its claims in the
/// request extensions. Requests without a token pass through untouched; the
/// extractors below decide whether a route needs one.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request.headers().get(AUTHORIZATION).map(|value| {
        value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    });
    let token = match bearer {
        None => return next.run(request).await,
        Some(Some(token)) => token,
        Some(None) => {
            warn!("Malformed Authorization header on {}", request.uri());
            return ApiError::Unauthorized("Invalid or expired token".to_string()).into_response();
        }
    };
    match state.tokens.verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            warn!("Rejected token on {}: {}", request.uri(), err);
            ApiError::from(err).into_response()
        }
    }
}

/// Any authenticated caller.
pub struct AuthUser(pub Claims);

/// An authenticated caller holding the `ADMIN` role.
pub struct AdminUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            warn!("User {} tried an admin-only route", claims.username);
            return Err(ApiError::Forbidden("Admin role required".to_string()));
        }
        Ok(AdminUser(claims))
    }
}
