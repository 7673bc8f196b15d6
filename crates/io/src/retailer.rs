// Retailer product export (CSV) import

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use vinvegan_match::config::RetailerConfig;
use vinvegan_match::model::{Company, Product, Source};

use crate::error::IoError;

/// Read file and convert to UTF-8 if needed (the retailer exports ISO-8859-1).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |source| IoError::Read { path: path.to_path_buf(), source };
    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Windows-1252 is a superset of the printable ISO-8859-1 range
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Load the export and group kept products by producer.
pub fn import(path: &Path, config: &RetailerConfig) -> Result<Vec<Company>, IoError> {
    let content = read_file_as_utf8(path)?;
    let companies = import_from_str(&content, config, path)?;
    log::info!(
        "loaded {} retailer companies ({} products) from {}",
        companies.len(),
        companies.iter().map(|c| c.products.len()).sum::<usize>(),
        path.display()
    );
    Ok(companies)
}

/// `path` is only used in error messages.
pub fn import_from_str(
    content: &str,
    config: &RetailerConfig,
    path: &Path,
) -> Result<Vec<Company>, IoError> {
    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(IoError::Delimiter(config.delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(path, &e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let columns = &config.columns;
    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| IoError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
    };
    let producer_col = column(&columns.producer)?;
    let kind_col = column(&columns.kind)?;
    column(&columns.sku)?;
    let country_col = headers.iter().position(|h| *h == columns.country);

    let mut companies: Vec<Company> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut filtered = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| malformed(path, &e))?;

        let kind = record.get(kind_col).unwrap_or("");
        if !keeps_type(kind, &config.type_filter) {
            filtered += 1;
            continue;
        }

        let producer = record.get(producer_col).unwrap_or("").trim();
        if producer.is_empty() {
            log::debug!("skipping product without producer on line {}", line_of(&record));
            continue;
        }

        let fields: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.trim().to_string()))
            .collect();

        let slot = *index.entry(producer.to_string()).or_insert_with(|| {
            companies.push(Company {
                source: Source::Retailer,
                id: producer.to_string(),
                name: producer.to_string(),
                countries: Default::default(),
                status: None,
                rating: None,
                url: None,
                products: Vec::new(),
            });
            companies.len() - 1
        });

        let company = &mut companies[slot];
        if let Some(country) = country_col.and_then(|c| record.get(c)).map(str::trim) {
            if !country.is_empty() {
                company.countries.insert(country.to_string());
            }
        }
        company.products.push(Product { fields });
    }

    log::debug!("{} products dropped by the type filter", filtered);
    Ok(companies)
}

fn keeps_type(kind: &str, filter: &[String]) -> bool {
    filter.is_empty() || filter.iter().any(|f| kind.contains(f.as_str()))
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn malformed(path: &Path, e: &csv::Error) -> IoError {
    IoError::MalformedRow {
        path: path.to_path_buf(),
        line: e.position().map(|p| p.line()).unwrap_or(0),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "Varenummer;Varenavn;Varetype;Land;Distrikt;Produktutvalg;Pris;Produsent;Vareurl";

    fn export(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn test_groups_by_producer() {
        let content = export(&[
            "1001;Teroldego;Rødvin;Italia;Trentino;Basisutvalg;229,90;Foradori;https://x/1001",
            "2001;Sangre de Toro;Rødvin;Spania;Catalonia;Bestillingsutvalget;149,90;Torres;https://x/2001",
            "1002;Manzoni Bianco;Hvitvin;Italia;Trentino;Bestillingsutvalget;259,90;Foradori;https://x/1002",
        ]);
        let companies =
            import_from_str(&content, &RetailerConfig::default(), Path::new("produkter.csv")).unwrap();

        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Foradori");
        assert_eq!(companies[0].products.len(), 2);
        assert_eq!(companies[0].products[1].get("Varenummer"), Some("1002"));
        assert!(companies[0].countries.contains("Italia"));
        assert_eq!(companies[1].name, "Torres");
    }

    #[test]
    fn test_type_filter() {
        let content = export(&[
            "1;A;Rødvin;Italia;;Basisutvalg;1;Foradori;",
            "2;B;Champagne, brut;Frankrike;;Basisutvalg;1;Bollinger;",
            "3;C;Akevitt;Norge;;Basisutvalg;1;Arcus;",
            "4;D;Øl;Norge;;Basisutvalg;1;Nøgne Ø;",
        ]);
        let companies =
            import_from_str(&content, &RetailerConfig::default(), Path::new("p.csv")).unwrap();
        let names: Vec<&str> = companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Foradori", "Bollinger"]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let content = export(&["3;C;Akevitt;Norge;;Basisutvalg;1;Arcus;"]);
        let mut config = RetailerConfig::default();
        config.type_filter.clear();
        let companies = import_from_str(&content, &config, Path::new("p.csv")).unwrap();
        assert_eq!(companies.len(), 1);
    }

    #[test]
    fn test_missing_column() {
        let content = "Varenummer;Varetype\n1;Rødvin\n";
        let err = import_from_str(content, &RetailerConfig::default(), Path::new("p.csv")).unwrap_err();
        match err {
            IoError::MissingColumn { column, .. } => assert_eq!(column, "Produsent"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_row_aborts_with_line() {
        let content = export(&[
            "1;A;Rødvin;Italia;;Basisutvalg;1;Foradori;",
            "2;B;Rødvin",
        ]);
        let err = import_from_str(&content, &RetailerConfig::default(), Path::new("p.csv")).unwrap_err();
        match err {
            IoError::MalformedRow { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut config = RetailerConfig::default();
        config.delimiter = '¦';
        let err = import_from_str(HEADER, &config, Path::new("p.csv")).unwrap_err();
        assert!(matches!(err, IoError::Delimiter('¦')));
    }

    #[test]
    fn test_latin1_file_decoded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("produkter.csv");
        let mut bytes = HEADER.as_bytes().to_vec();
        // "Rødvin" and "Château" in ISO-8859-1
        bytes.extend_from_slice(b"\n1;Ch\xe2teau;R\xf8dvin;Frankrike;;Basisutvalg;1;Ch\xe2teau Musar;\n");
        fs::write(&path, &bytes).unwrap();

        let companies = import(&path, &RetailerConfig::default()).unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Château Musar");
        assert_eq!(companies[0].products[0].get("Varetype"), Some("Rødvin"));
    }

    #[test]
    fn test_utf8_file_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("utf8.csv");
        fs::write(&path, "Name;Value\nØrjan;1\n").unwrap();
        let content = read_file_as_utf8(&path).unwrap();
        assert!(content.contains("Ørjan"));
    }
}
