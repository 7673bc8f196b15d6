// Registry (vegan status) JSON import

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use vinvegan_match::model::{Company, Source, VeganStatus};

use crate::error::IoError;

#[derive(Debug, Deserialize)]
struct RawCompany {
    id: serde_json::Value,
    company_name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    red_yellow_green: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Exports list companies either bare or wrapped as `{"company": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    Wrapped { company: RawCompany },
    Bare(RawCompany),
}

pub fn import(path: &Path) -> Result<Vec<Company>, IoError> {
    let content = std::fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let companies = import_from_str(&content).map_err(|message| IoError::Json {
        path: path.to_path_buf(),
        message,
    })?;
    log::info!("loaded {} registry companies from {}", companies.len(), path.display());
    Ok(companies)
}

pub fn import_from_str(content: &str) -> Result<Vec<Company>, String> {
    let entries: Vec<Entry> = serde_json::from_str(content).map_err(|e| e.to_string())?;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let raw = match entry {
                Entry::Wrapped { company } | Entry::Bare(company) => company,
            };
            to_company(raw).map_err(|e| format!("entry {index}: {e}"))
        })
        .collect()
}

fn to_company(raw: RawCompany) -> Result<Company, String> {
    let id = match raw.id {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        other => return Err(format!("unsupported id {other}")),
    };

    let countries: BTreeSet<String> = raw
        .country
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Company {
        source: Source::Registry,
        id,
        name: raw.company_name,
        countries,
        status: raw.status.as_deref().map(parse_status),
        rating: raw.red_yellow_green.filter(|r| !r.is_empty()),
        url: raw.url.filter(|u| !u.trim().is_empty()),
        products: Vec::new(),
    })
}

pub fn parse_status(label: &str) -> VeganStatus {
    match label.trim() {
        "Vegan Friendly" => VeganStatus::VeganFriendly,
        "Has Some Vegan Options" => VeganStatus::SomeVeganOptions,
        "Not Vegan Friendly" => VeganStatus::NotVeganFriendly,
        _ => VeganStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const EXPORT: &str = r#"[
        {"company": {"id": 4211, "company_name": "Foradori", "status": "Vegan Friendly",
                     "red_yellow_green": "green", "country": "Italy", "url": "www.foradori.it"}},
        {"id": "17", "company_name": "Torres", "status": "Has Some Vegan Options",
         "red_yellow_green": "yellow", "country": "Spain"},
        {"id": 9, "company_name": "Mystery", "status": "Unknown Yet", "country": ""}
    ]"#;

    #[test]
    fn test_wrapped_and_bare_entries() {
        let companies = import_from_str(EXPORT).unwrap();
        assert_eq!(companies.len(), 3);

        assert_eq!(companies[0].id, "4211");
        assert_eq!(companies[0].name, "Foradori");
        assert_eq!(companies[0].status, Some(VeganStatus::VeganFriendly));
        assert_eq!(companies[0].rating.as_deref(), Some("green"));
        assert_eq!(companies[0].url.as_deref(), Some("www.foradori.it"));
        assert!(companies[0].countries.contains("Italy"));

        assert_eq!(companies[1].id, "17");
        assert_eq!(companies[1].status, Some(VeganStatus::SomeVeganOptions));
        assert_eq!(companies[1].url, None);
    }

    #[test]
    fn test_unknown_status_and_blank_country() {
        let companies = import_from_str(EXPORT).unwrap();
        assert_eq!(companies[2].status, Some(VeganStatus::Unknown));
        assert!(companies[2].countries.is_empty());
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(import_from_str(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn test_rejects_bad_id() {
        let err = import_from_str(r#"[{"id": [1], "company_name": "X"}]"#).unwrap_err();
        assert!(err.contains("entry 0"), "{err}");
    }

    #[test]
    fn test_import_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wine.json");
        fs::write(&path, "not json").unwrap();
        let err = import(&path).unwrap_err();
        assert!(matches!(err, IoError::Json { .. }));
        assert!(err.to_string().contains("wine.json"));

        let missing = import(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, IoError::Read { .. }));
    }
}
