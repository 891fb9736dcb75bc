use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::{Role, User};

/// Authenticated identity for the current request. Inserted into request
/// extensions by [`authenticate`] and read by the policy layer and handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Authentication gate, run once per request before authorization.
///
/// A missing or non-Bearer Authorization header leaves the request anonymous
/// and lets the policy layer decide. A present token must verify and must
/// reference an existing account; a token whose subject has no account is an
/// error, not silent anonymity.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = bearer else {
        return Ok(next.run(req).await);
    };

    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "token rejected");
        ApiError::Unauthorized("invalid or expired token".into())
    })?;

    let user = User::find_by_email(&state.db, &claims.sub)
        .await
        .map_err(ApiError::Unexpected)?
        .ok_or_else(|| {
            warn!(subject = %claims.sub, "token subject has no account");
            ApiError::Unauthorized("user not found".into())
        })?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    });
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("authentication required".into()))
    }
}
