//! `vinvegan dupes`: names listed more than once in a catalog.

use std::path::{Path, PathBuf};

use vinvegan_io::output::registry_url;
use vinvegan_match::duplicates;
use vinvegan_match::model::{DuplicateReport, DuplicateSide, Source};
use vinvegan_match::MatchPolicy;

use crate::catalog::{load_registry, load_retailer};
use crate::exit_codes::EXIT_CONFIG_INVALID;
use crate::{policy, CliError};

pub fn cmd_dupes(
    config: Option<&Path>,
    registry: Option<PathBuf>,
    retailer: Option<PathBuf>,
    threshold: Option<f64>,
    json: bool,
) -> Result<(), CliError> {
    if registry.is_none() && retailer.is_none() {
        return Err(CliError::args("nothing to check")
            .with_hint("pass --registry <FILE>, --retailer <FILE>, or both"));
    }

    let mut policy = policy::load(config)?.policy;
    if let Some(t) = threshold {
        if !(t > 0.0 && t <= 1.0) {
            return Err(CliError::new(
                EXIT_CONFIG_INVALID,
                format!("--threshold must be within (0, 1], got {t}"),
            ));
        }
        policy.duplicates.threshold = t;
    }

    let mut reports = Vec::new();
    if let Some(path) = &registry {
        let companies = load_registry(path)?;
        reports.push(duplicates::report(Source::Registry, &companies, &policy));
    }
    if let Some(path) = &retailer {
        let companies = load_retailer(path, &policy)?;
        reports.push(duplicates::report(Source::Retailer, &companies, &policy));
    }

    if json {
        let text = serde_json::to_string_pretty(&reports)
            .map_err(|e| CliError::general(format!("cannot serialize report: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    for report in &reports {
        print_report(report, &policy);
    }
    Ok(())
}

fn locate(side: &DuplicateSide, source: Source, policy: &MatchPolicy) -> String {
    match source {
        Source::Registry => registry_url(&policy.registry.url_template, &side.id),
        Source::Retailer => side.skus.join(", "),
    }
}

fn print_report(report: &DuplicateReport, policy: &MatchPolicy) {
    println!(
        "{}: {} companies, {} identical names, {} near duplicates (> {})",
        report.source,
        report.companies,
        report.identical.len(),
        report.near.len(),
        policy.duplicates.threshold
    );

    for same in &report.identical {
        println!("  = {} [{}]", same.name, same.ids.join(", "));
    }

    for pair in &report.near {
        println!(
            "  {} ({}) ~ {} ({}) - {:.3}",
            pair.left.name, pair.left.id, pair.right.name, pair.right.id, pair.similarity
        );
        let left = locate(&pair.left, report.source, policy);
        let right = locate(&pair.right, report.source, policy);
        if !left.is_empty() || !right.is_empty() {
            println!("      {left} | {right}");
        }
    }
}
