//! `vinvegan match`: load both catalogs, run the engine, write results.

use std::path::{Path, PathBuf};

use vinvegan_io::{output, report};
use vinvegan_match::engine::rejected_total;
use vinvegan_match::model::MatchSummary;

use crate::catalog::{load_registry, load_retailer};
use crate::exit_codes::EXIT_OUTPUT_WRITE;
use crate::{policy, CliError};

pub fn cmd_match(
    config: Option<&Path>,
    registry: PathBuf,
    retailer: PathBuf,
    out_dir: PathBuf,
    html: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let loaded = policy::load(config)?;
    let policy = &loaded.policy;

    let registry_companies = load_registry(&registry)?;
    let retailer_companies = load_retailer(&retailer, policy)?;

    let result = vinvegan_match::run(policy, registry_companies, retailer_companies)?;

    let (vegan_path, some_path) = output::write_results(&out_dir, &result, policy)?;

    if let Some(html_path) = &html {
        let rendered = report::render_result(&result, policy);
        write_text(html_path, &rendered)?;
        log::info!("wrote report to {}", html_path.display());
    }

    if json {
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::general(format!("cannot serialize result: {e}")))?;
        println!("{text}");
    }

    print_summary(&result.summary);
    eprintln!("  {}", vegan_path.display());
    eprintln!("  {}", some_path.display());
    Ok(())
}

pub(crate) fn write_text(path: &Path, text: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::new(EXIT_OUTPUT_WRITE, format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, text).map_err(|e| {
        CliError::new(EXIT_OUTPUT_WRITE, format!("cannot write {}: {e}", path.display()))
    })
}

fn print_summary(summary: &MatchSummary) {
    eprintln!(
        "matched {} of {} registry companies against {} retailer producers",
        summary.matched, summary.registry_companies, summary.retailer_companies
    );
    eprintln!(
        "  vegan friendly: {}, some vegan options: {}",
        summary.vegan_friendly, summary.some_vegan_options
    );
    eprintln!(
        "  compared: {}, ambiguous: {}, ties: {}, country mismatches: {}, skipped: {}",
        summary.compared,
        summary.ambiguous,
        summary.ties,
        summary.country_mismatches,
        summary.skipped
    );
    let rejected = rejected_total(summary);
    if rejected > 0 {
        let detail: Vec<String> =
            summary.rejected.iter().map(|(reason, n)| format!("{reason}={n}")).collect();
        eprintln!("  rejected near misses: {} ({})", rejected, detail.join(", "));
    }
}
