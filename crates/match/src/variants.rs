//! Spelling variants of a company name for retailer searches.

use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::VariantConfig;

fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn trim_joiners(s: &str) -> &str {
    s.trim_end_matches(|c: char| c == '-' || c == '&' || c.is_whitespace())
}

/// Name without excluded words and trailing connectors.
pub fn short_name(name: &str, config: &VariantConfig) -> String {
    let kept: Vec<&str> = name
        .split_whitespace()
        .filter(|w| !config.excluded_words.contains(&w.to_lowercase()))
        .collect();
    let mut words: Vec<String> = trim_joiners(&kept.join(" "))
        .split_whitespace()
        .map(str::to_string)
        .collect();

    while words
        .last()
        .is_some_and(|w| config.trailing_words.contains(&w.to_lowercase()))
    {
        words.pop();
    }

    trim_joiners(&words.join(" ")).to_string()
}

/// Original name plus variants the retailer may list it under.
///
/// Everything is lower-cased. Variants shorter than `min_length` and
/// generic words are dropped; the original name is always kept unless
/// it is itself generic.
pub fn name_variants(name: &str, config: &VariantConfig) -> BTreeSet<String> {
    let original = name.trim().to_lowercase();
    let short = short_name(&original, config);

    let candidates = [
        short.clone(),
        short.replacen(' ', "-", 1),
        short.replacen(' ', "-", 2),
        strip_accents(&short),
    ];

    let mut names = BTreeSet::new();
    names.insert(original);
    for variant in candidates {
        let variant = variant.trim().to_string();
        if variant.chars().count() >= config.min_length {
            names.insert(variant);
        }
    }

    names.retain(|n| !config.generic_names.contains(n));
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_drops_excluded_and_trailing_words() {
        let config = VariantConfig::default();
        assert_eq!(short_name("Bonterra Organic Vineyards", &config), "Bonterra Vineyards");
        assert_eq!(short_name("Yalumba Family Wines", &config), "Yalumba");
        assert_eq!(short_name("Frog's Leap Winery &", &config), "Frog's Leap");
        assert_eq!(short_name("Smith and Sons", &config), "Smith");
    }

    #[test]
    fn variants_include_hyphenated_forms() {
        let config = VariantConfig::default();
        let variants = name_variants("Domaine de la Romanée Winery", &config);
        assert!(variants.contains("domaine de la romanée winery"));
        assert!(variants.contains("domaine de la romanée"));
        assert!(variants.contains("domaine-de la romanée"));
        assert!(variants.contains("domaine-de-la romanée"));
        assert!(variants.contains("domaine de la romanee"));
    }

    #[test]
    fn short_and_generic_variants_dropped() {
        let config = VariantConfig::default();
        let variants = name_variants("Ice Wines", &config);
        assert!(variants.contains("ice wines"));
        assert!(!variants.contains("ice"));

        let variants = name_variants("Creek Winery", &config);
        assert!(!variants.contains("creek"));
        assert!(variants.contains("creek winery"));
    }

    #[test]
    fn single_word_name() {
        let config = VariantConfig::default();
        let variants = name_variants("Foradori", &config);
        assert_eq!(variants.into_iter().collect::<Vec<_>>(), vec!["foradori"]);
    }
}
