// src/models/collection.rs

//! Collection keys and listing data.

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9][a-z0-9\-]*$").expect("valid key pattern"));

/// Canonical identifier of an icon collection (e.g. `fluent`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CollectionKey(String);

impl CollectionKey {
    /// Validate and lowercase a candidate key.
    pub fn parse(candidate: &str) -> Result<Self> {
        if Self::is_valid(candidate) {
            Ok(Self(candidate.to_lowercase()))
        } else {
            Err(AppError::invalid_input(candidate))
        }
    }

    /// Whether the string matches the strict key pattern.
    pub fn is_valid(candidate: &str) -> bool {
        KEY_PATTERN.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// License block of a collection's metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub title: Option<String>,
    /// Older documents use `name` instead of `title`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spdx: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl License {
    /// Human-readable license name.
    pub fn display_name(&self) -> Option<&str> {
        non_empty(&self.title).or_else(|| non_empty(&self.name))
    }

    /// SPDX identifier or license URL.
    pub fn reference(&self) -> Option<&str> {
        non_empty(&self.spdx).or_else(|| non_empty(&self.url))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Collection metadata. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub license: Option<License>,
}

/// Collection author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl CollectionInfo {
    /// Read metadata from an arbitrary JSON value, treating anything that
    /// is not a well-formed object as absent.
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        let Some(value) = value.filter(|v| v.is_object()) else {
            return Self::default();
        };
        serde_json::from_value(value.clone()).unwrap_or_else(|_| Self {
            // Salvage the license when other fields have unexpected types.
            license: value
                .get("license")
                .and_then(|l| serde_json::from_value(l.clone()).ok()),
            ..Self::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Category name to member icon names, in document order.
pub type Categories = IndexMap<String, Vec<String>>;

/// Everything a listing source knows about one collection.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub names: Vec<String>,
    pub info: CollectionInfo,
    pub categories: Categories,
}

impl Listing {
    /// Category for a name: the first category in document order that
    /// lists it.
    pub fn category_of(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == name))
            .map(|(category, _)| category.as_str())
    }
}
