// src/services/resolver.rs

//! Turns a free-form identifier or URL into a collection key.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::CollectionKey;

/// Iconify site paths that carry the key as their next segment.
static SITE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:iconify\.design/(?:icon-sets|icons)/|icon-sets\.iconify\.design/)([a-z0-9][a-z0-9\-]*)/?",
    )
    .expect("valid site url pattern")
});

/// Resolve a prefix such as `fluent` or a set URL such as
/// `https://icon-sets.iconify.design/fluent/` into a [`CollectionKey`].
///
/// Rules, first match wins:
/// 1. a recognized Iconify site URL yields the segment after the set path;
/// 2. any other absolute URL yields its last path segment, minus `.json`,
///    if that is a valid key;
/// 3. the trimmed input itself, if it is a valid key.
pub fn resolve(input: &str) -> Result<CollectionKey> {
    let input = input.trim();

    if let Some(key) = SITE_URL_PATTERN
        .captures(input)
        .and_then(|caps| caps.get(1))
    {
        return CollectionKey::parse(key.as_str());
    }

    if let Some(key) = key_from_url(input) {
        return Ok(key);
    }

    CollectionKey::parse(input).map_err(|_| AppError::invalid_input(input))
}

fn key_from_url(input: &str) -> Option<CollectionKey> {
    let url = Url::parse(input).ok()?;
    url.host_str()?;

    let last = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let last = last.to_lowercase();
    let candidate = last.strip_suffix(".json").unwrap_or(&last);
    CollectionKey::parse(candidate).ok()
}
