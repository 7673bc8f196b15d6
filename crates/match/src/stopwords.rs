use std::collections::{BTreeSet, HashMap};

use crate::config::MatchPolicy;
use crate::normalize::abbreviation_vocabulary;

/// Tokens that do not distinguish one company from another.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: BTreeSet<String>,
}

impl StopwordSet {
    /// Static policy stopwords ∪ `dynamic` ∪ abbreviation vocabulary ∪ legal suffixes.
    pub fn build(policy: &MatchPolicy, dynamic: BTreeSet<String>) -> Self {
        let mut words = dynamic;
        words.extend(policy.normalization.static_stopwords.iter().map(|w| w.to_ascii_lowercase()));
        words.extend(policy.normalization.legal_suffixes.iter().map(|w| w.to_ascii_lowercase()));
        words.extend(abbreviation_vocabulary(&policy.normalization.abbreviations));
        Self { words }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Most frequent tokens across canonical names.
///
/// Takes the `floor(factor × total / distinct)` most common tokens, so the
/// count grows with how repetitive the vocabulary is. Ties are broken
/// alphabetically to keep the result deterministic.
pub fn derive_dynamic<'a, I>(canonical_names: I, factor: f64) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for name in canonical_names {
        for token in name.split(' ').filter(|t| !t.is_empty()) {
            *counts.entry(token).or_insert(0) += 1;
            total += 1;
        }
    }

    if counts.is_empty() {
        return BTreeSet::new();
    }

    let take = (factor * total as f64 / counts.len() as f64).floor() as usize;

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(take).map(|(t, _)| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_takes_most_frequent() {
        let names = ["vina alpha", "vina beta", "vina gamma", "bodega alpha"];
        // total 8, distinct 5 → floor(1.0 * 8 / 5) = 1
        let dynamic = derive_dynamic(names.iter().copied(), 1.0);
        assert_eq!(dynamic.len(), 1);
        assert!(dynamic.contains("vina"));
    }

    #[test]
    fn dynamic_ties_are_alphabetical() {
        let names = ["b a", "a b", "c"];
        // total 5, distinct 3 → floor(1.5 * 5 / 3) = 2; a and b tie at 2
        let dynamic = derive_dynamic(names.iter().copied(), 1.5);
        assert_eq!(dynamic.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn dynamic_empty_input() {
        let dynamic = derive_dynamic(std::iter::empty(), 15.0);
        assert!(dynamic.is_empty());
    }

    #[test]
    fn dynamic_zero_factor() {
        let dynamic = derive_dynamic(["a a a"].iter().copied(), 0.0);
        assert!(dynamic.is_empty());
    }

    #[test]
    fn build_unions_all_sources() {
        let policy = MatchPolicy::default();
        let set = StopwordSet::build(&policy, ["vina".to_string()].into_iter().collect());
        assert!(set.contains("vina"));
        assert!(set.contains("winery"));
        assert!(set.contains("gmbh"));
        assert!(set.contains("dom"));
        assert!(set.contains("domaine"));
        assert!(!set.contains("montelena"));
        assert!(set.len() > policy.normalization.static_stopwords.len());
    }
}
