// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map view state.
//!
//! The view is always in exactly one [`Mode`]:
//!
//! - `Idle` → `Drafting` on double-click, only when logged in
//! - `Drafting` → `Idle` on cancel, or once the server accepted the pin
//! - any → `Selected` when a marker is clicked
//! - `Selected` → `Idle` when the popup closes

use crate::models::{NewPin, Pin, User};

/// Camera position of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            latitude: 47.040182,
            longitude: 17.071727,
            zoom: 4.0,
        }
    }
}

/// A pin being composed, anchored where the user double-clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftPin {
    pub lat: f64,
    pub long: f64,
    pub title: String,
    pub desc: String,
    pub rating: i32,
}

impl DraftPin {
    fn at(lat: f64, long: f64) -> Self {
        Self {
            lat,
            long,
            title: String::new(),
            desc: String::new(),
            rating: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    Drafting(DraftPin),
    /// Popup open for the pin with this id
    Selected(String),
}

/// How a marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Own,
    Other,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Log in to add pins")]
    NotAuthenticated,

    #[error("No pin is being drafted")]
    NoDraft,
}

#[derive(Debug, Clone)]
pub struct MapView {
    pins: Vec<Pin>,
    viewport: Viewport,
    current_user: Option<String>,
    mode: Mode,
}

impl MapView {
    pub fn new(current_user: Option<String>) -> Self {
        Self {
            pins: Vec::new(),
            viewport: Viewport::default(),
            current_user,
            mode: Mode::Idle,
        }
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// Replace the loaded pins with a fresh listing.
    pub fn load_pins(&mut self, pins: Vec<Pin>) {
        self.pins = pins;
        if let Mode::Selected(id) = &self.mode {
            if !self.pins.iter().any(|p| &p.id == id) {
                self.mode = Mode::Idle;
            }
        }
    }

    pub fn login(&mut self, username: impl Into<String>) {
        self.current_user = Some(username.into());
    }

    /// Drop the user and any unsent draft.
    pub fn logout(&mut self) {
        self.current_user = None;
        if matches!(self.mode, Mode::Drafting(_)) {
            self.mode = Mode::Idle;
        }
    }

    /// Start drafting a pin at the clicked location.
    pub fn double_click(&mut self, lat: f64, long: f64) -> Result<(), ViewError> {
        if self.current_user.is_none() {
            return Err(ViewError::NotAuthenticated);
        }
        self.mode = Mode::Drafting(DraftPin::at(lat, long));
        Ok(())
    }

    /// The draft being edited, if any.
    pub fn draft_mut(&mut self) -> Option<&mut DraftPin> {
        match &mut self.mode {
            Mode::Drafting(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn cancel_draft(&mut self) {
        if matches!(self.mode, Mode::Drafting(_)) {
            self.mode = Mode::Idle;
        }
    }

    /// Build the create request for the current draft.
    ///
    /// The view stays in `Drafting` until [`MapView::draft_accepted`] is
    /// called, so a failed request loses nothing.
    pub fn draft_request(&self) -> Result<NewPin, ViewError> {
        let Mode::Drafting(draft) = &self.mode else {
            return Err(ViewError::NoDraft);
        };
        let username = self
            .current_user
            .clone()
            .ok_or(ViewError::NotAuthenticated)?;

        Ok(NewPin {
            username: Some(username),
            title: draft.title.clone(),
            desc: draft.desc.clone(),
            rating: draft.rating,
            lat: draft.lat,
            long: draft.long,
        })
    }

    /// Record the server's copy of a submitted draft.
    pub fn draft_accepted(&mut self, pin: Pin) {
        self.pins.push(pin);
        self.mode = Mode::Idle;
    }

    /// Open the popup for a pin and centre the map on it.
    ///
    /// Returns false if no loaded pin has that id.
    pub fn select_pin(&mut self, id: &str) -> bool {
        let Some(pin) = self.pins.iter().find(|p| p.id == id) else {
            return false;
        };
        self.viewport.latitude = pin.lat;
        self.viewport.longitude = pin.long;
        self.mode = Mode::Selected(pin.id.clone());
        true
    }

    pub fn close_popup(&mut self) {
        if matches!(self.mode, Mode::Selected(_)) {
            self.mode = Mode::Idle;
        }
    }

    pub fn selected_pin(&self) -> Option<&Pin> {
        match &self.mode {
            Mode::Selected(id) => self.pins.iter().find(|p| &p.id == id),
            _ => None,
        }
    }

    pub fn marker_style(&self, pin: &Pin) -> MarkerStyle {
        match &self.current_user {
            Some(user) if User::id_for(user) == User::id_for(&pin.username) => MarkerStyle::Own,
            _ => MarkerStyle::Other,
        }
    }
}
