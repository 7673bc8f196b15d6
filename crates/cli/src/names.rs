//! `vinvegan normalize` and `vinvegan variants`.

use std::path::Path;

use serde::Serialize;
use vinvegan_match::variants::{name_variants, short_name};
use vinvegan_match::Normalizer;

use crate::{policy, CliError};

#[derive(Serialize)]
struct NormalizedName<'a> {
    name: &'a str,
    canonical: String,
    search_key: String,
}

/// Static stopwords only; derived stopwords need both catalogs.
pub fn cmd_normalize(
    config: Option<&Path>,
    names: Vec<String>,
    json: bool,
) -> Result<(), CliError> {
    let policy = policy::load(config)?.policy;
    let normalizer = Normalizer::from_policy(&policy);

    let rows: Vec<NormalizedName> = names
        .iter()
        .map(|name| {
            let canonical = normalizer.canonical(name);
            let search_key = normalizer.search_key_from_canonical(&canonical);
            NormalizedName { name, canonical, search_key }
        })
        .collect();

    if json {
        let text = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::general(format!("cannot serialize names: {e}")))?;
        println!("{text}");
    } else {
        for row in &rows {
            println!("{}\t{}\t{}", row.name, row.canonical, row.search_key);
        }
    }
    Ok(())
}

pub fn cmd_variants(config: Option<&Path>, names: Vec<String>) -> Result<(), CliError> {
    let policy = policy::load(config)?.policy;
    for name in &names {
        let short = short_name(name, &policy.variants);
        println!("{name} (short: {short})");
        let variants = name_variants(name, &policy.variants);
        if variants.is_empty() {
            println!("  (no usable variants)");
        }
        for variant in variants {
            println!("  {variant}");
        }
    }
    Ok(())
}
