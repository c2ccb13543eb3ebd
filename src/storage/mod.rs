//! Storage for downloaded icons.
//!
//! ## Directory Structure
//!
//! ```text
//! iconify_svgs/
//! ├── LICENSE.txt           # License summary (when the set declares one)
//! ├── mdi-home.svg          # {key}-{name}.svg, or {name}.svg with --no-prefix
//! └── Navigation/           # Per-category folders with --by-category
//!     └── mdi-arrow-left.svg
//! ```

pub mod local;

// Re-export for convenience
pub use local::{LICENSE_FILE, OutputDir};
