use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::MatchError;

// ---------------------------------------------------------------------------
// Top-level policy
// ---------------------------------------------------------------------------

/// One configuration-driven normalization + matching policy.
///
/// Every section is optional; a missing section resolves to the built-in
/// tables in [`crate::defaults`]. A table given in TOML replaces the
/// built-in one entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPolicy {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub normalization: NormalizationConfig,
    #[serde(default)]
    pub countries: CountryConfig,
    #[serde(default)]
    pub variants: VariantConfig,
    #[serde(default)]
    pub duplicates: DuplicateConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub retailer: RetailerConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_name() -> String {
    "default".into()
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            name: default_name(),
            thresholds: Thresholds::default(),
            normalization: NormalizationConfig::default(),
            countries: CountryConfig::default(),
            variants: VariantConfig::default(),
            duplicates: DuplicateConfig::default(),
            registry: RegistryConfig::default(),
            retailer: RetailerConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum longest-common-substring length between search keys.
    pub min_lcs: usize,
    /// Search-key similarity must exceed this.
    pub base_similarity: f64,
    /// Search-key similarity required when country sets are disjoint.
    pub strict_similarity: f64,
    /// Canonical-name similarity required unless the search keys are a close match.
    pub min_normalized_similarity: f64,
    /// Canonical-name similarity below which a candidate is always rejected.
    pub floor_normalized_similarity: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_lcs: 4,
            base_similarity: 0.85,
            strict_similarity: 0.9,
            min_normalized_similarity: 0.65,
            floor_normalized_similarity: 0.45,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub abbreviations: BTreeMap<String, String>,
    pub static_stopwords: BTreeSet<String>,
    pub legal_suffixes: BTreeSet<String>,
    /// Scale for the frequency-derived stopword count.
    pub stopword_factor: f64,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            abbreviations: pairs(defaults::ABBREVIATIONS),
            static_stopwords: words(defaults::STATIC_STOPWORDS),
            legal_suffixes: words(defaults::LEGAL_SUFFIXES),
            stopword_factor: 15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryConfig {
    pub translations: BTreeMap<String, String>,
    /// Registry countries skipped when the only candidates differ in country.
    pub skip_on_mismatch: BTreeSet<String>,
}

impl Default for CountryConfig {
    fn default() -> Self {
        Self {
            translations: pairs(defaults::COUNTRY_TRANSLATIONS),
            skip_on_mismatch: words(defaults::SKIP_COUNTRIES_ON_MISMATCH),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    pub excluded_words: BTreeSet<String>,
    pub trailing_words: BTreeSet<String>,
    pub generic_names: BTreeSet<String>,
    pub min_length: usize,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            excluded_words: words(defaults::VARIANT_EXCLUDED_WORDS),
            trailing_words: words(defaults::VARIANT_TRAILING_WORDS),
            generic_names: words(defaults::VARIANT_GENERIC_NAMES),
            min_length: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    pub threshold: f64,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self { threshold: 0.9 }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Link to a registry company page; `{id}` is replaced.
    pub url_template: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url_template: "http://www.barnivore.com/wine/{id}/company".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetailerConfig {
    pub delimiter: char,
    pub columns: RetailerColumns,
    /// A row is kept when its type column contains any of these substrings.
    /// Empty keeps every row.
    pub type_filter: Vec<String>,
}

impl Default for RetailerConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            columns: RetailerColumns::default(),
            type_filter: defaults::RETAILER_TYPE_FILTER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetailerColumns {
    pub sku: String,
    pub product_name: String,
    pub kind: String,
    pub country: String,
    pub region: String,
    pub selection: String,
    pub price: String,
    pub producer: String,
    pub url: String,
}

impl Default for RetailerColumns {
    fn default() -> Self {
        Self {
            sku: "Varenummer".into(),
            product_name: "Varenavn".into(),
            kind: "Varetype".into(),
            country: "Land".into(),
            region: "Distrikt".into(),
            selection: "Produktutvalg".into(),
            price: "Pris".into(),
            producer: "Produsent".into(),
            url: "Vareurl".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub vegan_friendly_heading: String,
    pub some_vegan_options_heading: String,
    /// Retailer search link; `{query}` is replaced with the url-encoded name.
    pub search_url_template: String,
    /// Selection value rendered in bold (the retailer's core assortment).
    pub highlight_selection: String,
    /// Word joining the last two items of an enumeration.
    pub conjunction: String,
    /// Noun after the product count ("12 varer").
    pub products_label: String,
    /// Word between product types and regions ("rødvin fra Italia").
    pub origin_word: String,
    /// Catch-all district value left out of region names.
    pub ignored_region: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            vegan_friendly_heading: "Veganske vinfirma på Vinmonopolet".into(),
            some_vegan_options_heading: "Delvis veganske vinfirma på Vinmonopolet".into(),
            search_url_template: "https://www.vinmonopolet.no/search?q={query}".into(),
            highlight_selection: "Basisutvalg".into(),
            conjunction: "og".into(),
            products_label: "varer".into(),
            origin_word: "fra".into(),
            ignored_region: "Øvrige".into(),
        }
    }
}

fn pairs(table: &[(&str, &str)]) -> BTreeMap<String, String> {
    table.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn words(table: &[&str]) -> BTreeSet<String> {
    table.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchPolicy {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let policy: MatchPolicy =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn to_toml(&self) -> Result<String, MatchError> {
        toml::to_string_pretty(self).map_err(|e| MatchError::ConfigSerialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let t = &self.thresholds;
        for (name, value) in [
            ("base_similarity", t.base_similarity),
            ("strict_similarity", t.strict_similarity),
            ("min_normalized_similarity", t.min_normalized_similarity),
            ("floor_normalized_similarity", t.floor_normalized_similarity),
            ("duplicates.threshold", self.duplicates.threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(MatchError::ThresholdRange { name, value });
            }
        }

        if t.strict_similarity < t.base_similarity {
            return Err(MatchError::ConfigValidation(format!(
                "strict_similarity ({}) must not be below base_similarity ({})",
                t.strict_similarity, t.base_similarity
            )));
        }

        if t.floor_normalized_similarity > t.min_normalized_similarity {
            return Err(MatchError::ConfigValidation(format!(
                "floor_normalized_similarity ({}) must not exceed min_normalized_similarity ({})",
                t.floor_normalized_similarity, t.min_normalized_similarity
            )));
        }

        if t.min_lcs == 0 {
            return Err(MatchError::ConfigValidation("min_lcs must be at least 1".into()));
        }

        if !(self.normalization.stopword_factor >= 0.0) {
            return Err(MatchError::ConfigValidation(
                "stopword_factor must be zero or positive".into(),
            ));
        }

        if !self.report.search_url_template.contains("{query}") {
            return Err(MatchError::ConfigValidation(
                "report.search_url_template must contain {query}".into(),
            ));
        }

        crate::normalize::check_abbreviations(&self.normalization.abbreviations)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
