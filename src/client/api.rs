// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed HTTP client for the pin API.

use crate::error::ErrorResponse;
use crate::models::{Credentials, LoginResponse, NewPin, Pin, PublicUser, Registration};
use crate::routes::HealthResponse;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Errors returned by [`PinClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {error}")]
    Api {
        status: u16,
        error: String,
        details: Option<String>,
    },
}

impl ClientError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// API client holding the session token after login.
#[derive(Clone)]
pub struct PinClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl PinClient {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:8800`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Resume a session with a previously issued token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        decode(response).await
    }

    /// Fetch all pins.
    pub async fn list_pins(&self) -> Result<Vec<Pin>, ClientError> {
        let response = self.http.get(self.url("/api/pins")).send().await?;
        decode(response).await
    }

    /// Create a pin as the logged-in user.
    pub async fn create_pin(&self, new_pin: &NewPin) -> Result<Pin, ClientError> {
        let request = self.http.post(self.url("/api/pins")).json(new_pin);
        let response = self.authorized(request).send().await?;
        decode(response).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .post(self.url("/api/users"))
            .json(registration)
            .send()
            .await?;
        decode(response).await
    }

    /// Log in and keep the returned token for later requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<PublicUser, ClientError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/users/login"))
            .json(&credentials)
            .send()
            .await?;
        let login: LoginResponse = decode(response).await?;

        self.token = Some(login.token);
        Ok(login.user)
    }

    /// Forget the session token.
    pub fn logout(&mut self) {
        self.token = None;
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let (error, details) = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => (body.error, body.details),
        Err(_) => (status.canonical_reason().unwrap_or("error").to_string(), Some(text)),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        error,
        details,
    })
}
