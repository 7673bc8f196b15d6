//! Likely duplicate companies within a single catalog.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::config::MatchPolicy;
use crate::model::{Company, DuplicatePair, DuplicateReport, DuplicateSide, IdenticalName, Source};
use crate::normalize::Normalizer;
use crate::similarity::similarity;

/// Companies listed more than once under exactly the same name.
pub fn find_identical(companies: &[Company]) -> Vec<IdenticalName> {
    let mut by_name: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for company in companies {
        by_name.entry(company.name.as_str()).or_default().push(company.id.clone());
    }
    by_name
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(name, ids)| IdenticalName { name: name.to_string(), ids })
        .collect()
}

/// Pairs of distinct canonical names scoring above `threshold`, best first.
///
/// Companies collapsing to the same canonical name are represented by the
/// first one listed.
pub fn find_near_duplicates(
    companies: &[Company],
    normalizer: &Normalizer,
    threshold: f64,
    sku_column: &str,
) -> Vec<DuplicatePair> {
    let mut seen: BTreeMap<String, &Company> = BTreeMap::new();
    for company in companies {
        seen.entry(normalizer.canonical(&company.name)).or_insert(company);
    }
    let distinct: Vec<(String, &Company)> = seen.into_iter().collect();

    log::info!(
        "comparing company names ({} combinations)",
        distinct.len() * distinct.len().saturating_sub(1) / 2
    );

    let mut pairs: Vec<DuplicatePair> = (0..distinct.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let distinct = &distinct;
            ((i + 1)..distinct.len()).filter_map(move |j| {
                let (left_key, left) = &distinct[i];
                let (right_key, right) = &distinct[j];
                let score = similarity(left_key, right_key);
                (score > threshold).then(|| DuplicatePair {
                    left: side(left, left_key, sku_column),
                    right: side(right, right_key, sku_column),
                    similarity: score,
                })
            })
        })
        .collect();

    pairs.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.left.canonical.cmp(&b.left.canonical))
            .then_with(|| a.right.canonical.cmp(&b.right.canonical))
    });
    pairs
}

fn side(company: &Company, canonical: &str, sku_column: &str) -> DuplicateSide {
    let mut skus: Vec<String> = company
        .products
        .iter()
        .filter_map(|p| p.get(sku_column))
        .map(str::to_string)
        .collect();
    skus.sort();
    DuplicateSide {
        id: company.id.clone(),
        name: company.name.clone(),
        canonical: canonical.to_string(),
        skus,
    }
}

/// Identical and near-duplicate names for one catalog.
pub fn report(source: Source, companies: &[Company], policy: &MatchPolicy) -> DuplicateReport {
    let normalizer = Normalizer::from_policy(policy);
    DuplicateReport {
        source,
        companies: companies.len(),
        identical: find_identical(companies),
        near: find_near_duplicates(
            companies,
            &normalizer,
            policy.duplicates.threshold,
            &policy.retailer.columns.sku,
        ),
    }
}
