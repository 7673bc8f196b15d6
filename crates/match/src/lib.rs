//! `vinvegan-match`: fuzzy producer-name matching between a vegan registry
//! and a retailer catalog.
//!
//! Pure engine crate: receives loaded companies, returns matched results.
//! No CLI or IO dependencies.

pub mod config;
pub mod defaults;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod resolver;
pub mod similarity;
pub mod stopwords;
pub mod variants;

pub use config::MatchPolicy;
pub use engine::run;
pub use error::MatchError;
pub use model::{Company, MatchResult, MatchedCompany, Product, Source, VeganStatus};
pub use normalize::Normalizer;
