// JSON export of match results

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use vinvegan_match::config::MatchPolicy;
use vinvegan_match::model::{MatchResult, MatchedCompany};

use crate::error::IoError;
use crate::{SOME_VEGAN_OPTIONS_FILE, VEGAN_FRIENDLY_FILE};

/// Link to the registry page of a company.
pub fn registry_url(template: &str, id: &str) -> String {
    template.replace("{id}", id)
}

/// One output record. Keys come out sorted because `serde_json::Map` is
/// ordered by key.
pub fn company_record(matched: &MatchedCompany, policy: &MatchPolicy) -> Value {
    let registry = &matched.registry;
    let alternatives: Vec<&str> = matched.alternatives.iter().map(|c| c.name.as_str()).collect();

    let mut record = json!({
        "id": registry.id,
        "company_name": registry.name,
        "status": registry.status.map(|s| s.to_string()),
        "red_yellow_green": registry.rating,
        "url": registry.url,
        "country": registry.countries.iter().next(),
        "countries": matched.countries,
        "registry_url": registry_url(&policy.registry.url_template, &registry.id),
        "canonical_name": matched.canonical,
        "search_key": matched.search_key,
        "retailer_company_name": matched.best.name,
        "scores": matched.best.scores,
        "products_found_at_retailer": matched.products,
    });

    if let Value::Object(map) = &mut record {
        if matched.country_mismatch {
            map.insert("country_mismatch".into(), Value::Bool(true));
        }
        if matched.tie {
            map.insert("tie".into(), Value::Bool(true));
        }
        if !alternatives.is_empty() {
            map.insert("alternatives".into(), json!(alternatives));
        }
    }
    record
}

/// Pretty JSON to `path`, UTF-8, non-ASCII kept as is.
pub fn write_json(path: &Path, value: &Value) -> Result<(), IoError> {
    let write_err = |source| IoError::Write { path: path.to_path_buf(), source };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| write_err(std::io::Error::other(e)))?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    Ok(())
}

/// Write both category files into `dir`; returns their paths.
pub fn write_results(
    dir: &Path,
    result: &MatchResult,
    policy: &MatchPolicy,
) -> Result<(PathBuf, PathBuf), IoError> {
    std::fs::create_dir_all(dir)
        .map_err(|source| IoError::Write { path: dir.to_path_buf(), source })?;

    let records = |companies: &[MatchedCompany]| -> Value {
        Value::Array(companies.iter().map(|m| company_record(m, policy)).collect())
    };

    let vegan_path = dir.join(VEGAN_FRIENDLY_FILE);
    write_json(&vegan_path, &records(&result.vegan_friendly))?;
    log::info!("wrote {} companies to {}", result.vegan_friendly.len(), vegan_path.display());

    let some_path = dir.join(SOME_VEGAN_OPTIONS_FILE);
    write_json(&some_path, &records(&result.some_vegan_options))?;
    log::info!("wrote {} companies to {}", result.some_vegan_options.len(), some_path.display());

    Ok((vegan_path, some_path))
}

/// Read back a category file written by [`write_results`].
pub fn read_results(path: &Path) -> Result<Vec<Value>, IoError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| IoError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
