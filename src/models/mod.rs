// src/models/mod.rs

//! Domain models for the downloader.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod collection;
mod config;
mod outcome;

// Re-export all public types
pub use collection::{Author, Categories, CollectionInfo, CollectionKey, License, Listing};
pub use config::{Config, DownloadConfig, Endpoints, HttpConfig};
pub use outcome::{FAILURE_DISPLAY_CAP, Failure, FetchOutcome, RunSummary, WorkItem, WorkPlan};
