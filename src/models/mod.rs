// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod bbox;
pub mod pin;
pub mod user;

pub use bbox::BoundingBox;
pub use pin::{NewPin, Pin, PinUpdate};
pub use user::{Credentials, LoginResponse, PublicUser, Registration, User};
