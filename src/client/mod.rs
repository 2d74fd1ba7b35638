// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client side of the map: an API client and the view state it drives.

pub mod api;
pub mod view;

pub use api::{ClientError, PinClient};
pub use view::{DraftPin, MapView, MarkerStyle, Mode, Viewport, ViewError};

/// Errors from driving a [`MapView`] through a [`PinClient`].
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Load every pin into the view. On failure the view is left unchanged.
pub async fn refresh(client: &PinClient, view: &mut MapView) -> Result<(), ClientError> {
    match client.list_pins().await {
        Ok(pins) => {
            view.load_pins(pins);
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load pins");
            Err(e)
        }
    }
}

/// Send the current draft and append the created pin to the view.
///
/// On failure the draft stays open so the user can retry.
pub async fn submit_draft(client: &PinClient, view: &mut MapView) -> Result<(), SyncError> {
    let request = view.draft_request()?;
    match client.create_pin(&request).await {
        Ok(pin) => {
            view.draft_accepted(pin);
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create pin");
            Err(e.into())
        }
    }
}
