// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pin routes.
//!
//! Listing and reading pins is public; creating, editing and deleting
//! require a session and are restricted to the pin's owner.

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::models::{BoundingBox, NewPin, Pin, PinUpdate, User};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Public pin routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pins", get(list_pins))
        .route("/api/pins/{id}", get(get_pin))
}

/// Pin routes that need an authenticated user.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pins", post(create_pin))
        .route(
            "/api/pins/{id}",
            axum::routing::put(update_pin).delete(delete_pin),
        )
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct PinsQuery {
    /// Only pins created by this user
    username: Option<String>,
    /// Only pins inside `minLong,minLat,maxLong,maxLat`
    bbox: Option<String>,
}

/// List all pins in creation order.
async fn list_pins(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PinsQuery>,
) -> Result<Json<Vec<Pin>>> {
    let bbox = params
        .bbox
        .as_deref()
        .map(str::parse::<BoundingBox>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    // Usernames match case-insensitively; pins carry the account's display name
    let owner = match params.username.as_deref().map(User::id_for) {
        Some(id) if !id.is_empty() => match state.db.get_user(&id).await? {
            Some(user) => Some(user.username),
            None => return Ok(Json(Vec::new())),
        },
        _ => None,
    };

    let mut pins = state.db.list_pins(owner.as_deref()).await?;
    if let Some(bbox) = bbox {
        pins.retain(|pin| bbox.contains(&pin.location()));
    }

    tracing::debug!(
        count = pins.len(),
        username = ?params.username,
        bbox = ?params.bbox,
        "Listed pins"
    );

    Ok(Json(pins))
}

/// Get a single pin.
async fn get_pin(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<Pin>> {
    let pin = state
        .db
        .get_pin(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pin {} not found", id)))?;
    Ok(Json(pin))
}

// ─── Mutations ───────────────────────────────────────────────

/// Create a pin owned by the session user.
async fn create_pin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<NewPin>,
) -> Result<(StatusCode, Json<Pin>)> {
    let body = body.normalized();
    body.validate()?;

    if let Some(claimed) = &body.username {
        if User::id_for(claimed) != user.user_id {
            return Err(AppError::Forbidden(
                "Cannot create pins on behalf of another user".to_string(),
            ));
        }
    }

    // The account may have been removed since the token was issued
    let owner = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let pin = Pin::new(&owner.username, body);
    let created = state.db.create_pin(&pin).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update fields of a pin the session user owns.
async fn update_pin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(body): AppJson<PinUpdate>,
) -> Result<Json<Pin>> {
    let body = body.normalized();
    body.validate()?;
    if body.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let mut pin = load_owned_pin(&state, &user, &id).await?;
    pin.apply(body);
    let updated = state.db.update_pin(&pin).await?;

    tracing::info!(pin_id = %id, user_id = %user.user_id, "Pin updated");
    Ok(Json(updated))
}

/// Delete a pin the session user owns.
async fn delete_pin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    load_owned_pin(&state, &user, &id).await?;
    state.db.delete_pin(&id).await?;

    tracing::info!(pin_id = %id, user_id = %user.user_id, "Pin deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn load_owned_pin(state: &AppState, user: &AuthUser, id: &str) -> Result<Pin> {
    let pin = state
        .db
        .get_pin(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pin {} not found", id)))?;

    if User::id_for(&pin.username) != user.user_id {
        tracing::warn!(pin_id = %id, user_id = %user.user_id, "Rejected change to another user's pin");
        return Err(AppError::Forbidden("Pin belongs to another user".to_string()));
    }

    Ok(pin)
}
