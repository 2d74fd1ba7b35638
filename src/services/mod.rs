// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod password;

pub use password::{hash_password, verify_password, verify_unknown_user, PasswordError};
