// Catalog loading shared by the subcommands

use std::path::Path;

use vinvegan_io::{registry, retailer};
use vinvegan_match::{Company, MatchPolicy, VeganStatus};

use crate::CliError;

pub fn load_registry(path: &Path) -> Result<Vec<Company>, CliError> {
    let companies = registry::import(path)?;
    let matchable = companies
        .iter()
        .filter(|c| c.status.is_some_and(|s| s.is_matchable()))
        .count();
    let unknown = companies
        .iter()
        .filter(|c| matches!(c.status, None | Some(VeganStatus::Unknown)))
        .count();
    log::debug!(
        "registry {}: {} of {} companies are matchable",
        path.display(),
        matchable,
        companies.len()
    );
    if unknown > 0 {
        log::debug!("registry {}: {} companies without a known status", path.display(), unknown);
    }
    Ok(companies)
}

pub fn load_retailer(path: &Path, policy: &MatchPolicy) -> Result<Vec<Company>, CliError> {
    let companies = retailer::import(path, &policy.retailer)?;
    let products: usize = companies.iter().map(|c| c.products.len()).sum();
    log::debug!(
        "retailer {}: {} products under {} producers",
        path.display(),
        products,
        companies.len()
    );
    Ok(companies)
}
