use std::sync::LazyLock;

use regex::Regex;
use ::uuid::Uuid;

static UUID_V4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("uuid pattern is valid")
});

/// Generate a random RFC 4122 version 4 uuid
///
/// Lowercase, hyphenated, e.g. `9716498c-45df-47d2-8099-3f678446d776`.
pub fn uuid() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Check if a string is a version 4 uuid (case-insensitive)
pub fn is_uuid(candidate: &str) -> bool {
    UUID_V4.is_match(candidate)
}
