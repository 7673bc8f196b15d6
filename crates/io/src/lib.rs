// Catalog loading and result writing

pub mod error;
pub mod output;
pub mod registry;
pub mod report;
pub mod retailer;

pub use error::IoError;

/// File names of the per-category match results.
pub const VEGAN_FRIENDLY_FILE: &str = "vegan-friendly-searchresult.json";
pub const SOME_VEGAN_OPTIONS_FILE: &str = "some-vegan-options-searchresult.json";
