// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts keyed by lowercased username)
//! - Pins (keyed by generated id)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Pin, User};
use firestore::errors::FirestoreError;
use futures_util::TryStreamExt;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id (lowercased username).
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by (lowercased) email address.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(users.pop())
    }

    /// Create a new user.
    ///
    /// Fails with `Conflict` if the username or email is already taken. The
    /// username check is enforced by create-only semantics on the document
    /// id, so concurrent registrations of one name cannot both succeed.
    pub async fn create_user(&self, user: &User) -> Result<User, AppError> {
        if self.find_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let created: User = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| match e {
                FirestoreError::DataConflictError(_) => {
                    AppError::Conflict(format!("Username '{}' is already taken", user.username))
                }
                other => AppError::Database(other.to_string()),
            })?;

        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }

    // ─── Pin Operations ──────────────────────────────────────────

    /// Get a pin by id.
    pub async fn get_pin(&self, pin_id: &str) -> Result<Option<Pin>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PINS)
            .obj()
            .one(pin_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List pins in creation order, optionally only those of one user.
    pub async fn list_pins(&self, username: Option<&str>) -> Result<Vec<Pin>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PINS);

        let query = if let Some(username) = username {
            let username = username.to_string();
            query.filter(move |q| q.for_all([q.field("username").eq(username.clone())]))
        } else {
            query
        };

        let stream = query
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj::<Pin>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        stream
            .try_collect::<Vec<Pin>>()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new pin and return the stored document.
    pub async fn create_pin(&self, pin: &Pin) -> Result<Pin, AppError> {
        let created: Pin = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::PINS)
            .document_id(&pin.id)
            .object(pin)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(pin_id = %created.id, username = %created.username, "Pin created");
        Ok(created)
    }

    /// Overwrite an existing pin.
    pub async fn update_pin(&self, pin: &Pin) -> Result<Pin, AppError> {
        let updated: Pin = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PINS)
            .document_id(&pin.id)
            .object(pin)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(updated)
    }

    /// Delete a pin.
    pub async fn delete_pin(&self, pin_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PINS)
            .document_id(pin_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
