//! Alias generation and validation.
//!
//! Generated aliases draw from an alphabet without look-alike characters
//! (`0`/`O`/`o`, `1`/`l`/`I`) so they survive being read aloud or retyped.

use std::sync::LazyLock;

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;

/// Characters used for generated aliases.
pub const ALIAS_ALPHABET: &[u8] = b"23456789abcdefghijkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Longest alias accepted from a client.
pub const MAX_ALIAS_LENGTH: usize = 64;

/// Paths owned by the service itself.
const RESERVED_ALIASES: &[&str] = &["shorten", "analytics", "health", "api", "static", "admin"];

static ALIAS_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Whether `alias` collides with a path the service routes itself.
pub fn is_reserved(alias: &str) -> bool {
    RESERVED_ALIASES.contains(&alias)
}

/// Generates a random alias of `length` characters over [`ALIAS_ALPHABET`].
///
/// Never returns a reserved alias.
pub fn generate_alias(length: usize) -> String {
    let mut rng = rand::rng();

    generate_from(length, || rng.random_range(0..ALIAS_ALPHABET.len()))
}

/// Draws candidates from `pick` (indices into [`ALIAS_ALPHABET`]) until one
/// is not reserved.
fn generate_from(length: usize, mut pick: impl FnMut() -> usize) -> String {
    loop {
        let candidate: String = (0..length)
            .map(|_| ALIAS_ALPHABET[pick() % ALIAS_ALPHABET.len()] as char)
            .collect();

        if !is_reserved(&candidate) {
            return candidate;
        }
    }
}

/// Validates a client-requested alias.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot start with `-` or `_`
/// - Cannot be a reserved service path
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() {
        return Err(AppError::invalid_input(
            "Alias must not be empty",
            json!({ "field": "alias" }),
        ));
    }

    if alias.len() > MAX_ALIAS_LENGTH {
        return Err(AppError::invalid_input(
            format!("Alias must be at most {MAX_ALIAS_LENGTH} characters"),
            json!({ "field": "alias", "provided_length": alias.len() }),
        ));
    }

    if !ALIAS_CHARS_REGEX.is_match(alias) {
        return Err(AppError::invalid_input(
            "Alias can only contain letters, digits, hyphens and underscores",
            json!({ "field": "alias" }),
        ));
    }

    if alias.starts_with(['-', '_']) {
        return Err(AppError::invalid_input(
            "Alias must start with a letter or digit",
            json!({ "field": "alias" }),
        ));
    }

    if is_reserved(alias) {
        return Err(AppError::invalid_input(
            "This alias is reserved",
            json!({ "field": "alias" }),
        ));
    }

    Ok(())
}
