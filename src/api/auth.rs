//! Authentication endpoints

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    config::AuthConfig,
    error::AppResult,
    models::user::{ChangePasswordRequest, CurrentUser, LoginRequest, LoginResponse},
    AppState,
};

use super::AuthenticatedUser;

/// Log in and receive a session cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (token, user) = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;

    let jar = jar.add(session_cookie(&state.config.auth, token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            token,
            user: CurrentUser::from(&user),
        }),
    ))
}

/// Drop the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = String, content_type = "text/plain")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    jar: CookieJar,
) -> (CookieJar, &'static str) {
    tracing::info!(user_id = claims.user_id, "User logged out");
    (jar.remove(removal_cookie(&state.config.auth)), "Logged out")
}

/// Current principal
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CurrentUser>> {
    let user = state.services.auth.current_user(claims.user_id).await?;
    Ok(Json(CurrentUser::from(&user)))
}

/// Change a password with the current one
#[utoipa::path(
    post,
    path = "/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = String, content_type = "text/plain"),
        (status = 401, description = "Wrong current password", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown user", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> AppResult<&'static str> {
    state.services.auth.change_password(&request).await?;
    Ok("Password changed")
}

fn session_cookie(config: &AuthConfig, token: String) -> Cookie<'static> {
    // Browsers drop SameSite=None cookies that are not Secure
    let same_site = if config.cookie_secure {
        SameSite::None
    } else {
        SameSite::Lax
    };

    let mut cookie = Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(same_site)
        .max_age(time::Duration::hours(config.jwt_expiration_hours as i64));

    if let Some(domain) = &config.cookie_domain {
        cookie = cookie.domain(domain.clone());
    }
    cookie.build()
}

/// Cookie matching the session cookie's path and domain, for removal
fn removal_cookie(config: &AuthConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((config.cookie_name.clone(), String::new())).path("/");
    if let Some(domain) = &config.cookie_domain {
        cookie = cookie.domain(domain.clone());
    }
    cookie.build()
}
