// src/services/filter.rs

//! Name filtering by inclusion, exclusion and substring.

use std::collections::HashSet;

/// Predicates applied to a collection's icon names.
///
/// Empty sets and empty substrings behave as if absent.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    include: Option<HashSet<String>>,
    exclude: Option<HashSet<String>>,
    contains: Option<String>,
}

impl ItemFilter {
    pub fn new(
        include: Option<HashSet<String>>,
        exclude: Option<HashSet<String>>,
        contains: Option<String>,
    ) -> Self {
        Self {
            include: include.filter(|s| !s.is_empty()),
            exclude: exclude.filter(|s| !s.is_empty()),
            contains: contains
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Build a filter from comma-separated command line values.
    pub fn from_csv(include: &str, exclude: &str, contains: &str) -> Self {
        Self::new(
            Some(split_csv(include)),
            Some(split_csv(exclude)),
            Some(contains.to_string()),
        )
    }

    /// Whether any predicate is set.
    pub fn is_active(&self) -> bool {
        self.include.is_some() || self.exclude.is_some() || self.contains.is_some()
    }

    /// Whether a single name passes every predicate.
    pub fn matches(&self, name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.contains(name) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.contains(name) {
                return false;
            }
        }
        if let Some(needle) = &self.contains {
            if !name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }

    /// Keep matching names, preserving order.
    pub fn apply<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.matches(name))
            .map(str::to_string)
            .collect()
    }
}

/// Split a comma-separated list, trimming entries and dropping empties.
pub fn split_csv(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
