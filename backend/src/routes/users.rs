//! User and authentication routes
//!
//! - `POST /signup`, `POST /login`: public
//! - `GET /me`, `PATCH /update-my-password`: behind `protect`
//! - `GET /`: behind `protect` and `restrict_to(admin)`

use crate::auth::{protect, restrict_to, AllowedRoles, AuthUser};
use crate::error::{ApiJson, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use authgate_shared::{
    AuthResponse, LoginRequest, Role, SignUpRequest, UpdatePasswordRequest, UserResponse,
    UsersResponse,
};
use axum::{
    extract::State,
    middleware,
    routing::{get, patch, post},
    Extension, Json, Router,
};

/// Roles allowed to list all users
pub const USER_ADMIN_ROLES: &[Role] = &[Role::Admin];

/// Create user routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_users))
        .route_layer(middleware::from_fn_with_state(
            AllowedRoles(USER_ADMIN_ROLES),
            restrict_to,
        ));

    let protected = Router::new()
        .route("/me", get(get_me))
        .route("/update-my-password", patch(update_my_password))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state, protect));

    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .merge(protected)
}

/// Register a new user
///
/// POST /api/v1/users/signup
async fn sign_up(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let issued = UserService::sign_up(state.users(), state.jwt(), req).await?;
    Ok(Json(AuthResponse::new(issued.token, Some(issued.user))))
}

/// Login with email and password
///
/// POST /api/v1/users/login
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let token = UserService::login(
        state.users(),
        state.jwt(),
        req.email.as_deref(),
        req.password.as_deref(),
    )
    .await?;
    Ok(Json(AuthResponse::new(token, None)))
}

/// Current user
///
/// GET /api/v1/users/me
async fn get_me(auth_user: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(auth_user.user))
}

/// Change the current user's password and issue a fresh token
///
/// PATCH /api/v1/users/update-my-password
async fn update_my_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(req): ApiJson<UpdatePasswordRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let issued =
        UserService::update_password(state.users(), state.jwt(), auth_user.user.id, req).await?;
    Ok(Json(AuthResponse::new(issued.token, Some(issued.user))))
}

/// All users (admin only)
///
/// GET /api/v1/users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = UserService::list(state.users()).await?;
    Ok(Json(UsersResponse::from(users)))
}
