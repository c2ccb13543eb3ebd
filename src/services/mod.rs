//! Service layer for the downloader.
//!
//! This module contains the business logic for:
//! - Prefix resolution (`resolve`)
//! - Icon listing with fallback (`ListingSource` and its implementations)
//! - Name filtering (`ItemFilter`)

mod filter;
mod listing;
mod resolver;

pub use filter::{ItemFilter, split_csv};
pub use listing::{
    ApiListing, FallbackListing, ListingSource, LocalListing, MirrorListing, fetch_listing,
    listing_source,
};
pub use resolver::resolve;
