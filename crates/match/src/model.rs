use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Registry,
    Retailer,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry => write!(f, "registry"),
            Self::Retailer => write!(f, "retailer"),
        }
    }
}

/// Registry classification of a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VeganStatus {
    #[serde(rename = "Vegan Friendly")]
    VeganFriendly,
    #[serde(rename = "Has Some Vegan Options")]
    SomeVeganOptions,
    #[serde(rename = "Not Vegan Friendly")]
    NotVeganFriendly,
    #[serde(other, rename = "Unknown")]
    Unknown,
}

impl VeganStatus {
    /// Statuses worth looking up at the retailer.
    pub fn is_matchable(&self) -> bool {
        matches!(self, Self::VeganFriendly | Self::SomeVeganOptions)
    }
}

impl std::fmt::Display for VeganStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeganFriendly => write!(f, "Vegan Friendly"),
            Self::SomeVeganOptions => write!(f, "Has Some Vegan Options"),
            Self::NotVeganFriendly => write!(f, "Not Vegan Friendly"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One retailer product. Fields are kept as exported; the matcher never
/// looks inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product {
    pub fields: BTreeMap<String, String>,
}

impl Product {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// A producer from either catalog, in the shared shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub source: Source,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub countries: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VeganStatus>,
    /// Registry traffic-light tag (red / yellow / green).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

/// A company with its derived comparison strings.
#[derive(Debug, Clone)]
pub struct NormalizedCompany {
    pub company: Company,
    pub canonical: String,
    pub search_key: String,
    /// Country keys in the retailer's language. Empty when unknown, which
    /// counts as disjoint from every other set.
    pub countries: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Candidate decisions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    /// Similarity of the search keys.
    pub search: f64,
    /// Similarity of the canonical names.
    pub canonical: f64,
    /// Longest common substring of the search keys.
    pub lcs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotSimilar,
    NamesVaryTooMuch,
    CountryMismatch,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSimilar => write!(f, "not_similar"),
            Self::NamesVaryTooMuch => write!(f, "names_vary_too_much"),
            Self::CountryMismatch => write!(f, "country_mismatch"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchDecision {
    Accepted { scores: Scores, country_mismatch: bool },
    Rejected { scores: Scores, reason: RejectReason },
}

impl MatchDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn scores(&self) -> Scores {
        match self {
            Self::Accepted { scores, .. } | Self::Rejected { scores, .. } => *scores,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Retailer company accepted as a candidate for a registry company.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub canonical: String,
    pub scores: Scores,
    pub country_mismatch: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedCompany {
    pub registry: Company,
    pub canonical: String,
    pub search_key: String,
    pub countries: BTreeSet<String>,
    /// Best candidate; its products are the ones found at the retailer.
    pub best: Candidate,
    pub products: Vec<Product>,
    /// Other accepted candidates, best first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Candidate>,
    pub country_mismatch: bool,
    /// Best candidate won by list order among equal scores.
    pub tie: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchSummary {
    pub registry_companies: usize,
    pub retailer_companies: usize,
    pub compared: usize,
    pub matched: usize,
    pub vegan_friendly: usize,
    pub some_vegan_options: usize,
    pub ambiguous: usize,
    pub ties: usize,
    pub country_mismatches: usize,
    pub skipped: usize,
    pub rejected: BTreeMap<String, usize>,
    pub stopwords: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub policy_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub meta: MatchMeta,
    pub summary: MatchSummary,
    pub vegan_friendly: Vec<MatchedCompany>,
    pub some_vegan_options: Vec<MatchedCompany>,
}

// ---------------------------------------------------------------------------
// Duplicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateSide {
    pub id: String,
    pub name: String,
    pub canonical: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skus: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicatePair {
    pub left: DuplicateSide,
    pub right: DuplicateSide,
    pub similarity: f64,
}

/// Companies sharing an identical raw name.
#[derive(Debug, Clone, Serialize)]
pub struct IdenticalName {
    pub name: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub source: Source,
    pub companies: usize,
    pub identical: Vec<IdenticalName>,
    pub near: Vec<DuplicatePair>,
}
