//! Role allow-lists.
//!
//! Two ways to gate a route:
//! - as a layer: `route_layer(middleware::from_fn_with_state(state, require_admin))`
//!   for routers where every route shares the same allow-list
//! - as an extractor: `RequireAdmin(user)` / `RequireStaff(user)` in a handler's
//!   arguments for routers that mix public and restricted methods
//!
//! Both verify the token first, so a missing or bad token is a 401 and a
//! valid token with the wrong role is a 403.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use learnhub_auth::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub const STAFF_ROLES: &[UserRole] = &[UserRole::Teacher, UserRole::Admin];
pub const ADMIN_ROLES: &[UserRole] = &[UserRole::Admin];

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if allowed_roles.contains(&auth_user.role()) {
        Ok(())
    } else {
        Err(AppError::forbidden(anyhow!(
            "Forbidden: insufficient permissions"
        )))
    }
}

/// Authenticates the request, checks the caller's role against `allowed_roles`
/// and leaves the caller in the request extensions for downstream extractors.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    parts.extensions.insert(auth_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, ADMIN_ROLES).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

macro_rules! role_extractor {
    ($(#[$meta:meta])* $name:ident, $roles:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = AuthUser::from_request_parts(parts, state).await?;
                check_any_role(&auth_user, $roles)?;
                Ok($name(auth_user))
            }
        }
    };
}

role_extractor!(
    /// Admins only.
    RequireAdmin,
    ADMIN_ROLES
);
role_extractor!(
    /// Teachers and admins.
    RequireStaff,
    STAFF_ROLES
);
