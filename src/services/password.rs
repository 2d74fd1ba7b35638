// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing with Argon2.
//!
//! Hashes use the standard PHC encoding (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! which records its own parameters so the cost can be raised later without
//! invalidating existing accounts.

use ring::rand::{SecureRandom, SystemRandom};
use std::sync::LazyLock;

const SALT_LEN: usize = 16;

/// Hash of a throwaway password with the same cost as real hashes.
static UNKNOWN_USER_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unknown-user-placeholder").ok());

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Random number generation failed")]
    Rng,

    #[error("Password hashing failed: {0}")]
    Hash(#[from] argon2::Error),
}

/// Hash a password with a fresh random salt and the default cost.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_config(password, &argon2::Config::default())
}

/// Hash a password with explicit Argon2 parameters.
pub fn hash_password_with_config(
    password: &str,
    config: &argon2::Config,
) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasswordError::Rng)?;

    Ok(argon2::hash_encoded(password.as_bytes(), &salt, config)?)
}

/// Check a password against a stored hash in constant time.
///
/// Returns `Ok(false)` on mismatch and `Err` only if the stored value
/// cannot be decoded.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    Ok(argon2::verify_encoded(encoded, password.as_bytes())?)
}

/// Spend the cost of one verification for a login naming no account.
pub fn verify_unknown_user(password: &str) {
    if let Some(hash) = UNKNOWN_USER_HASH.as_deref() {
        let _ = argon2::verify_encoded(hash, password.as_bytes());
    }
}
