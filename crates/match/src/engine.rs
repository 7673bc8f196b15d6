use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::config::MatchPolicy;
use crate::error::MatchError;
use crate::model::{
    Candidate, Company, MatchDecision, MatchMeta, MatchResult, MatchSummary, MatchedCompany,
    NormalizedCompany, RejectReason, Scores, VeganStatus,
};
use crate::normalize::Normalizer;
use crate::resolver::{could_match, evaluate, resolve_best, skips_country_mismatch};
use crate::stopwords::derive_dynamic;

const PROGRESS_EVERY: usize = 500;

/// Both catalogs normalized against a shared stopword set.
pub struct Prepared {
    pub normalizer: Normalizer,
    pub registry: Vec<NormalizedCompany>,
    pub retailer: Vec<NormalizedCompany>,
}

/// Derive stopwords over both catalogs and normalize every company.
///
/// Registry countries are translated into the retailer's language;
/// retailer countries are only folded.
pub fn prepare(policy: &MatchPolicy, registry: Vec<Company>, retailer: Vec<Company>) -> Prepared {
    let base = Normalizer::from_policy(policy);
    let registry_canonical: Vec<String> =
        registry.iter().map(|c| base.canonical(&c.name)).collect();
    let retailer_canonical: Vec<String> =
        retailer.iter().map(|c| base.canonical(&c.name)).collect();

    let dynamic = derive_dynamic(
        registry_canonical.iter().chain(retailer_canonical.iter()).map(String::as_str),
        policy.normalization.stopword_factor,
    );
    log::debug!("derived {} frequency stopwords", dynamic.len());
    let normalizer = Normalizer::new(policy, dynamic);

    let registry = registry
        .into_iter()
        .zip(registry_canonical)
        .map(|(company, canonical)| {
            let countries = registry_countries(&normalizer, &company);
            normalized(&normalizer, company, canonical, countries)
        })
        .collect();

    let retailer = retailer
        .into_iter()
        .zip(retailer_canonical)
        .map(|(company, canonical)| {
            let countries = company
                .countries
                .iter()
                .filter_map(|c| normalizer.country_key(c))
                .collect();
            normalized(&normalizer, company, canonical, countries)
        })
        .collect();

    Prepared { normalizer, registry, retailer }
}

fn normalized(
    normalizer: &Normalizer,
    company: Company,
    canonical: String,
    countries: BTreeSet<String>,
) -> NormalizedCompany {
    let search_key = normalizer.search_key_from_canonical(&canonical);
    NormalizedCompany { company, canonical, search_key, countries }
}

fn registry_countries(normalizer: &Normalizer, company: &Company) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for raw in &company.countries {
        let Some(key) = normalizer.country_key(raw) else { continue };
        if let Some(translated) = normalizer.translate_country(&key) {
            keys.insert(translated.to_string());
        } else {
            if !normalizer.is_translated_country(&key) {
                log::warn!("no translation for country '{}' (company id {})", raw, company.id);
            }
            keys.insert(key);
        }
    }
    keys
}

// ---------------------------------------------------------------------------
// Scan (parallel)
// ---------------------------------------------------------------------------

/// Comparison of one registry company against the whole retailer catalog.
struct Scan {
    registry: usize,
    compared: usize,
    not_similar: usize,
    accepted: Vec<(usize, Scores, bool)>,
    rejected: Vec<(usize, Scores, RejectReason)>,
}

fn scan(
    index: usize,
    company: &NormalizedCompany,
    retailer: &[NormalizedCompany],
    policy: &MatchPolicy,
) -> Scan {
    let thresholds = &policy.thresholds;
    let mut out = Scan {
        registry: index,
        compared: retailer.len(),
        not_similar: 0,
        accepted: Vec::new(),
        rejected: Vec::new(),
    };

    for (ri, candidate) in retailer.iter().enumerate() {
        if !could_match(&company.search_key, &candidate.search_key, thresholds) {
            out.not_similar += 1;
            continue;
        }
        match evaluate(company, candidate, thresholds) {
            MatchDecision::Accepted { scores, country_mismatch } => {
                out.accepted.push((ri, scores, country_mismatch));
            }
            MatchDecision::Rejected { reason: RejectReason::NotSimilar, .. } => {
                out.not_similar += 1
            }
            MatchDecision::Rejected { scores, reason } => out.rejected.push((ri, scores, reason)),
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Match every vegan-relevant registry company against the retailer catalog.
pub fn run(
    policy: &MatchPolicy,
    registry: Vec<Company>,
    retailer: Vec<Company>,
) -> Result<MatchResult, MatchError> {
    policy.validate()?;

    let prepared = prepare(policy, registry, retailer);
    let Prepared { normalizer, registry, retailer } = &prepared;

    let targets: Vec<usize> = registry
        .iter()
        .enumerate()
        .filter(|(_, c)| c.company.status.is_some_and(|s| s.is_matchable()))
        .map(|(i, _)| i)
        .collect();

    log::info!(
        "comparing {} registry companies against {} retailer companies on {} threads",
        targets.len(),
        retailer.len(),
        rayon::current_num_threads()
    );

    let counter = AtomicUsize::new(0);
    let scans: Vec<Scan> = targets
        .par_iter()
        .map(|&i| {
            let result = scan(i, &registry[i], retailer, policy);
            let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_EVERY == 0 {
                log::debug!("  scanned {} / {} registry companies", done, targets.len());
            }
            result
        })
        .collect();

    let mut summary = MatchSummary {
        registry_companies: registry.len(),
        retailer_companies: retailer.len(),
        stopwords: normalizer.stopwords().len(),
        ..MatchSummary::default()
    };

    let mut vegan_friendly = Vec::new();
    let mut some_vegan_options = Vec::new();

    for scan in scans {
        let subject = &registry[scan.registry];
        summary.compared += scan.compared;
        if scan.not_similar > 0 {
            *summary
                .rejected
                .entry(RejectReason::NotSimilar.to_string())
                .or_insert(0) += scan.not_similar;
        }

        for (ri, scores, reason) in &scan.rejected {
            *summary.rejected.entry(reason.to_string()).or_insert(0) += 1;
            let other = &retailer[*ri].company.name;
            match reason {
                RejectReason::CountryMismatch => log::warn!(
                    "ignoring match between companies '{}' and '{}', countries differ",
                    subject.company.name,
                    other
                ),
                _ => log::warn!(
                    "ignoring match between companies '{}' and '{}', listed names vary too much - {:.3}, {:.3}",
                    subject.company.name,
                    other,
                    scores.canonical,
                    scores.search
                ),
            }
        }

        let Some(matched) = resolve(subject, &scan, retailer, policy, &mut summary) else {
            continue;
        };

        summary.matched += 1;
        if matched.country_mismatch {
            summary.country_mismatches += 1;
        }
        match matched.registry.status {
            Some(VeganStatus::VeganFriendly) => vegan_friendly.push(matched),
            Some(VeganStatus::SomeVeganOptions) => some_vegan_options.push(matched),
            _ => {}
        }
    }

    sort_matches(&mut vegan_friendly);
    sort_matches(&mut some_vegan_options);
    summary.vegan_friendly = vegan_friendly.len();
    summary.some_vegan_options = some_vegan_options.len();

    log::info!(
        "found {} possible vegan company matches and {} with some vegan options",
        summary.vegan_friendly,
        summary.some_vegan_options
    );

    Ok(MatchResult {
        meta: MatchMeta {
            policy_name: policy.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        vegan_friendly,
        some_vegan_options,
    })
}

/// Turn accepted candidates into a single match, applying the
/// country-mismatch skip rule and best-candidate selection.
fn resolve(
    subject: &NormalizedCompany,
    scan: &Scan,
    retailer: &[NormalizedCompany],
    policy: &MatchPolicy,
    summary: &mut MatchSummary,
) -> Option<MatchedCompany> {
    let skip_mismatch = skips_country_mismatch(subject, &policy.countries.skip_on_mismatch);

    let mut indices = Vec::new();
    let mut candidates = Vec::new();
    for &(ri, scores, country_mismatch) in &scan.accepted {
        let other = &retailer[ri];
        if country_mismatch {
            if skip_mismatch {
                log::info!(
                    "skipping '{}' ({}) with country value mismatch against '{}'",
                    subject.company.name,
                    join(&subject.countries),
                    other.company.name
                );
                summary.skipped += 1;
                continue;
            }
            log::warn!(
                "country mismatch for companies '{}' and '{}'",
                subject.company.name,
                other.company.name
            );
        }
        indices.push(ri);
        candidates.push(Candidate {
            id: other.company.id.clone(),
            name: other.company.name.clone(),
            canonical: other.canonical.clone(),
            scores,
            country_mismatch,
        });
    }

    let (best_index, tie) = resolve_best(&candidates)?;

    if candidates.len() > 1 {
        summary.ambiguous += 1;
        log::info!(
            "multiple possible matches for company '{}' ({}):",
            subject.company.name,
            subject.company.rating.as_deref().unwrap_or("-")
        );
        for c in &candidates {
            log::info!("    '{}' ('{}' ≈ '{}')", c.name, subject.canonical, c.canonical);
        }
        log::info!(
            "selected '{}' as the closest match - {:.3}",
            candidates[best_index].name,
            candidates[best_index].scores.canonical
        );
    } else {
        let c = &candidates[0];
        log::info!(
            "possible match for company '{}': '{}' ({}) - {:.3}, {:.3}",
            subject.company.name,
            c.name,
            subject.company.rating.as_deref().unwrap_or("-"),
            c.scores.canonical,
            c.scores.search
        );
    }

    if tie {
        summary.ties += 1;
        log::warn!(
            "tie between candidates for '{}'; kept '{}' by list order",
            subject.company.name,
            candidates[best_index].name
        );
    }

    let country_mismatch = candidates.iter().any(|c| c.country_mismatch);
    let products = retailer[indices[best_index]].company.products.clone();
    let best = candidates.remove(best_index);
    candidates.sort_by(|a, b| {
        b.scores.canonical.total_cmp(&a.scores.canonical).then_with(|| a.name.cmp(&b.name))
    });

    Some(MatchedCompany {
        registry: subject.company.clone(),
        canonical: subject.canonical.clone(),
        search_key: subject.search_key.clone(),
        countries: subject.countries.clone(),
        best,
        products,
        alternatives: candidates,
        country_mismatch,
        tie,
    })
}

fn sort_matches(matches: &mut [MatchedCompany]) {
    matches.sort_by(|a, b| {
        a.registry
            .name
            .to_lowercase()
            .cmp(&b.registry.name.to_lowercase())
            .then_with(|| a.registry.id.cmp(&b.registry.id))
    });
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Per-reason rejection counts, keyed the way the summary reports them.
pub fn rejected_total(summary: &MatchSummary) -> usize {
    summary.rejected.values().sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
