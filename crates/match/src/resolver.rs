use std::collections::BTreeSet;

use crate::config::Thresholds;
use crate::model::{Candidate, MatchDecision, NormalizedCompany, RejectReason, Scores};
use crate::similarity::{longest_common_substring, similarity};

/// The two country sets share no country.
///
/// An empty set shares nothing, so a company without known countries is
/// disjoint from every other company and only matches on a close name.
pub fn countries_disjoint(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    a.is_disjoint(b)
}

/// Country-independent part of [`is_match`]: `lcs >= min_lcs` and
/// similarity above `base_similarity`.
pub fn keys_similar(a: &str, b: &str, thresholds: &Thresholds) -> bool {
    longest_common_substring(a, b) >= thresholds.min_lcs
        && similarity(a, b) > thresholds.base_similarity
}

/// Threshold test on two search keys.
///
/// Requires [`keys_similar`], and similarity above `strict_similarity` when
/// the country sets are disjoint. Symmetric in its arguments.
pub fn is_match(
    a: &str,
    b: &str,
    countries_a: &BTreeSet<String>,
    countries_b: &BTreeSet<String>,
    thresholds: &Thresholds,
) -> bool {
    if !keys_similar(a, b, thresholds) {
        return false;
    }
    !countries_disjoint(countries_a, countries_b) || similarity(a, b) > thresholds.strict_similarity
}

/// Cheap upper bound on [`similarity`] from lengths alone. Pairs failing it
/// can skip the quadratic comparison.
pub fn could_match(a: &str, b: &str, thresholds: &Thresholds) -> bool {
    let la = a.chars().count();
    let lb = b.chars().count();
    if la.min(lb) < thresholds.min_lcs {
        return false;
    }
    let bound = 2.0 * la.min(lb) as f64 / (la + lb) as f64;
    bound > thresholds.base_similarity
}

/// Full candidate decision for a registry company against a retailer company.
///
/// Accepted exactly when [`is_match`] holds on the search keys and the
/// canonical names pass the normalized-similarity gate.
pub fn evaluate(
    registry: &NormalizedCompany,
    retailer: &NormalizedCompany,
    thresholds: &Thresholds,
) -> MatchDecision {
    let scores = Scores {
        search: similarity(&registry.search_key, &retailer.search_key),
        canonical: similarity(&registry.canonical, &retailer.canonical),
        lcs: longest_common_substring(&registry.search_key, &retailer.search_key),
    };

    if !keys_similar(&registry.search_key, &retailer.search_key, thresholds) {
        return MatchDecision::Rejected { scores, reason: RejectReason::NotSimilar };
    }

    let close = scores.search > thresholds.strict_similarity;

    if scores.canonical < thresholds.floor_normalized_similarity
        || (!close && scores.canonical < thresholds.min_normalized_similarity)
    {
        return MatchDecision::Rejected { scores, reason: RejectReason::NamesVaryTooMuch };
    }

    if !is_match(
        &registry.search_key,
        &retailer.search_key,
        &registry.countries,
        &retailer.countries,
        thresholds,
    ) {
        return MatchDecision::Rejected { scores, reason: RejectReason::CountryMismatch };
    }

    let country_mismatch = countries_disjoint(&registry.countries, &retailer.countries);
    MatchDecision::Accepted { scores, country_mismatch }
}

/// Registry companies from these countries are dropped rather than flagged
/// when they only match across a country mismatch.
pub fn skips_country_mismatch(registry: &NormalizedCompany, skip: &BTreeSet<String>) -> bool {
    registry.countries.iter().any(|c| skip.contains(c))
}

/// Index of the candidate with the highest canonical-name similarity, and
/// whether another candidate scored the same (first one wins).
pub fn resolve_best(candidates: &[Candidate]) -> Option<(usize, bool)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        match best {
            Some((_, score)) if candidate.scores.canonical <= score => {}
            _ => best = Some((i, candidate.scores.canonical)),
        }
    }
    best.map(|(index, score)| {
        let tie = candidates
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.scores.canonical == score);
        (index, tie)
    })
}
