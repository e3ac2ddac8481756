//! Route protection and role restriction
//!
//! `protect` authenticates the bearer token and attaches the caller as an
//! [`AuthUser`] request extension; `restrict_to` runs after it and checks the
//! caller's role against the route's allowed set.

use crate::error::ApiError;
use crate::state::AppState;
use authgate_shared::{AuthError, Role, User};
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// Authenticated caller, attached to the request by [`protect`]
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// Roles allowed through [`restrict_to`]
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [Role]);

fn reject(err: AuthError) -> ApiError {
    metrics::counter!("auth_rejections_total", "reason" => err.reason()).increment(1);
    debug!(reason = err.reason(), "request rejected");
    ApiError::Auth(err)
}

/// Token part of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|rest| rest.split(' ').next())
        .filter(|token| !token.is_empty())
}

/// Run the bearer-token checks against request headers.
///
/// Order: token present, signature and expiry valid, subject still exists,
/// password not changed since the token was issued.
pub async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| reject(AuthError::NotLoggedIn))?;

    let claims = state
        .jwt()
        .verify_token(token)
        .map_err(|e| reject(e.into()))?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| reject(AuthError::UserNoLongerExists))?;

    let user = state
        .users()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| reject(AuthError::UserNoLongerExists))?;

    if user.changed_password_after(claims.iat) {
        warn!(user_id = %user.id, "token issued before password change");
        return Err(reject(AuthError::PasswordChanged));
    }

    Ok(AuthUser {
        user: user.to_user(),
    })
}

/// Middleware granting access only to requests with a valid bearer token.
///
/// Apply with `middleware::from_fn_with_state(state, protect)`.
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authorize(&state, request.headers()).await?;
    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Check that a user's role is one of `allowed`
pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        warn!(user_id = %user.id, role = %user.role, "role not permitted");
        Err(reject(AuthError::InsufficientRole))
    }
}

/// Middleware rejecting callers whose role is not allowed.
///
/// Must run inside [`protect`]; apply with
/// `middleware::from_fn_with_state(AllowedRoles(&[Role::Admin]), restrict_to)`.
pub async fn restrict_to(
    State(AllowedRoles(allowed)): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| reject(AuthError::NotLoggedIn))?;

    require_role(&auth_user.user, allowed)?;
    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let app_state = AppState::from_ref(state);
        authorize(&app_state, &parts.headers).await
    }
}
