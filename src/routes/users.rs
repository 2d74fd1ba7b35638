// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and session routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::auth::{create_jwt, AuthUser, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::models::{Credentials, LoginResponse, PublicUser, Registration, User};
use crate::services::password;
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(register))
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/logout", post(logout))
}

/// User routes that need an authenticated user.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// Register a new account. The response never includes the password.
async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<Registration>,
) -> Result<(StatusCode, Json<PublicUser>)> {
    let body = body.normalized();
    body.validate()?;

    let Registration {
        username,
        email,
        password,
    } = body;

    // Argon2 is deliberately slow; keep it off the async workers
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))?;

    let user = User {
        id: User::id_for(&username),
        username,
        email,
        password_hash,
        created_at: now_rfc3339(),
    };

    let created = state.db.create_user(&user).await?;
    Ok((StatusCode::CREATED, Json(created.to_public())))
}

/// Log in with username and password.
///
/// Returns the session token in the body and as an HttpOnly cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    AppJson(body): AppJson<Credentials>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let user_id = User::id_for(&body.username);
    if user_id.is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let password = body.password;

    // Unknown user and wrong password look the same to the caller, in
    // both the response and the time taken
    let Some(user) = state.db.get_user(&user_id).await? else {
        tokio::task::spawn_blocking(move || password::verify_unknown_user(&password))
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        return Err(AppError::InvalidCredentials);
    };

    let password_hash = user.password_hash.clone();
    let verified =
        tokio::task::spawn_blocking(move || password::verify_password(&password, &password_hash))
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

    match verified {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::InvalidCredentials);
        }
        Err(e) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Stored password hash for {} unusable: {}",
                user.id,
                e
            )));
        }
    }

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64));

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token,
            user: user.to_public(),
        }),
    ))
}

/// Log out by clearing the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let removal = Cookie::build(SESSION_COOKIE)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure);

    (jar.remove(removal), StatusCode::NO_CONTENT)
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PublicUser>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(profile.to_public()))
}
