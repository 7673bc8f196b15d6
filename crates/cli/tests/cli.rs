// End-to-end tests for the `vinvegan` binary.
// Run with: cargo test -p vinvegan-cli --test cli -- --nocapture

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const POLICY: &str = r#"
name = "cli-test"

[normalization]
stopword_factor = 0.0
"#;

const REGISTRY: &str = r#"[
  {"company": {"id": 101, "company_name": "Azienda Agricola Foradori", "status": "Vegan Friendly",
               "red_yellow_green": "green", "country": "Italy", "url": "www.foradori.it"}},
  {"company": {"id": 102, "company_name": "Bodegas Torres S.A.", "status": "Has Some Vegan Options",
               "red_yellow_green": "yellow", "country": "Spain"}},
  {"id": "105", "company_name": "Penfolds", "status": "Not Vegan Friendly", "country": "Australia"}
]"#;

/// Retailer export in ISO-8859-1, as the retailer ships it.
fn retailer_bytes() -> Vec<u8> {
    let text = "\
Varenummer;Varenavn;Varetype;Land;Distrikt;Produktutvalg;Pris;Produsent;Vareurl
1001;Foradori Teroldego 2020;R\u{f8}dvin;Italia;Trentino;Basisutvalg;249,90;Foradori;https://example.test/1001
2001;Torres Sangre de Toro;R\u{f8}dvin;Spania;Catalu\u{f1}a;Bestillingsutvalget;139,90;Torres;https://example.test/2001
2002;Torres Vi\u{f1}a Esmeralda;Hvitvin;Spania;\u{d8}vrige;Bestillingsutvalget;149,90;Torres;https://example.test/2002
5001;Penfolds Bin 28;R\u{f8}dvin;Australia;South Australia;Basisutvalg;299,90;Penfolds;https://example.test/5001
9001;Torres Cerveza;\u{d8}l;Spania;\u{d8}vrige;Basisutvalg;39,90;Torres;https://example.test/9001
";
    // Every char above is within Latin-1.
    text.chars().map(|c| c as u32 as u8).collect()
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("policy.toml"), POLICY).unwrap();
        fs::write(dir.path().join("wine.json"), REGISTRY).unwrap();
        fs::write(dir.path().join("produkter.csv"), retailer_bytes()).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn vinvegan(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_vinvegan"))
            .current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env_remove("VINVEGAN_CONFIG")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .unwrap()
    }

    fn vinvegan_with_policy(&self, args: &[&str]) -> Output {
        let mut full = vec!["--config", "policy.toml"];
        full.extend_from_slice(args);
        self.vinvegan(&full)
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// match / report
// ---------------------------------------------------------------------------

#[test]
fn match_writes_both_result_files() {
    let ws = Workspace::new();
    let out = ws.vinvegan_with_policy(&[
        "match", "wine.json", "produkter.csv", "--out-dir", "results", "--html", "results/index.html",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let friendly: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(ws.path().join("results/vegan-friendly-searchresult.json")).unwrap(),
    )
    .unwrap();
    let friendly = friendly.as_array().unwrap();
    assert_eq!(friendly.len(), 1);
    assert_eq!(friendly[0]["company_name"], "Azienda Agricola Foradori");
    assert_eq!(friendly[0]["id"], "101");
    assert_eq!(friendly[0]["products_found_at_retailer"][0]["Varetype"], "Rødvin");

    let some: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(ws.path().join("results/some-vegan-options-searchresult.json")).unwrap(),
    )
    .unwrap();
    let some = some.as_array().unwrap();
    assert_eq!(some.len(), 1);
    assert_eq!(some[0]["company_name"], "Bodegas Torres S.A.");
    // the beer row is dropped by the type filter
    assert_eq!(some[0]["products_found_at_retailer"].as_array().unwrap().len(), 2);

    let html = fs::read_to_string(ws.path().join("results/index.html")).unwrap();
    assert!(html.contains("<h1>"));
    assert!(html.contains("Azienda Agricola Foradori</a>"));
    assert!(html.contains("Rødvin fra Italia/Trentino"));
}

#[test]
fn match_json_goes_to_stdout() {
    let ws = Workspace::new();
    let out = ws.vinvegan_with_policy(&["-q", "match", "wine.json", "produkter.csv", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let result: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(result["meta"]["policy_name"], "cli-test");
    assert_eq!(result["summary"]["matched"], 2);
    assert_eq!(result["summary"]["registry_companies"], 3);
}

#[test]
fn report_renders_from_written_files() {
    let ws = Workspace::new();
    let out = ws.vinvegan_with_policy(&["match", "wine.json", "produkter.csv"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let out = ws.vinvegan_with_policy(&["report"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let html = stdout(&out);
    assert!(html.contains("Bodegas Torres S.A.</a>. 2 varer."));
    assert!(html.contains("Hvitvin og Rødvin fra Spania og Spania/Cataluña."));
}

#[test]
fn report_without_results_fails_with_hint() {
    let ws = Workspace::new();
    let out = ws.vinvegan_with_policy(&["report", "--dir", "nowhere"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("vinvegan match"));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_registry_is_a_read_error() {
    let ws = Workspace::new();
    let out = ws.vinvegan_with_policy(&["match", "absent.json", "produkter.csv"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("absent.json"));
}

#[test]
fn malformed_registry_is_a_json_error() {
    let ws = Workspace::new();
    fs::write(ws.path().join("broken.json"), "{\"not\": \"a list\"}").unwrap();
    let out = ws.vinvegan_with_policy(&["match", "broken.json", "produkter.csv"]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn missing_producer_column_is_a_csv_error() {
    let ws = Workspace::new();
    fs::write(ws.path().join("short.csv"), "Varenummer;Varetype\n1;Rødvin\n").unwrap();
    let out = ws.vinvegan_with_policy(&["match", "wine.json", "short.csv"]);
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("Produsent"));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn invalid_policy_exits_10() {
    let ws = Workspace::new();
    fs::write(ws.path().join("bad.toml"), "[thresholds]\nbase_similarity = 85\n").unwrap();
    let out = ws.vinvegan(&["--config", "bad.toml", "match", "wine.json", "produkter.csv"]);
    assert_eq!(out.status.code(), Some(10));
    assert!(stderr(&out).contains("base_similarity"));
}

#[test]
fn explicit_missing_policy_exits_11() {
    let ws = Workspace::new();
    let out = ws.vinvegan(&["--config", "nope.toml", "config", "show"]);
    assert_eq!(out.status.code(), Some(11));
}

#[test]
fn dupes_without_source_is_a_usage_error() {
    let ws = Workspace::new();
    let out = ws.vinvegan(&["dupes"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn dupes_threshold_out_of_range() {
    let ws = Workspace::new();
    let out = ws.vinvegan(&["dupes", "--registry", "wine.json", "--threshold", "1.5"]);
    assert_eq!(out.status.code(), Some(10));
}

// ---------------------------------------------------------------------------
// dupes / names / config
// ---------------------------------------------------------------------------

#[test]
fn dupes_lists_near_duplicate_producers() {
    let ws = Workspace::new();
    let mut csv = retailer_bytes();
    csv.extend_from_slice(
        b"1002;Foradori Manzoni Bianco;Hvitvin;Italia;Trentino;Basisutvalg;199,90;Foradorii;https://example.test/1002\n",
    );
    fs::write(ws.path().join("produkter.csv"), csv).unwrap();

    let out = ws.vinvegan(&["dupes", "--retailer", "produkter.csv", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let reports: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(reports[0]["source"], "retailer");
    assert_eq!(reports[0]["near"][0]["left"]["name"], "Foradori");
    assert_eq!(reports[0]["near"][0]["right"]["name"], "Foradorii");
    assert_eq!(reports[0]["near"][0]["right"]["skus"][0], "1002");
}

#[test]
fn normalize_prints_tab_separated_keys() {
    let ws = Workspace::new();
    let out = ws.vinvegan(&["normalize", "Château Montelena Winery", "Bodegas Torres S.A."]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 3, "line: {line}");
        assert!(fields[1].is_ascii());
    }
    assert!(lines[0].starts_with("Château Montelena Winery\t"));
    assert!(lines[0].split('\t').nth(1).unwrap().contains("montelena"));
}

#[test]
fn normalize_json() {
    let ws = Workspace::new();
    let out = ws.vinvegan(&["normalize", "Bodegas Torres S.A.", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let rows: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(rows[0]["name"], "Bodegas Torres S.A.");
    assert!(rows[0]["canonical"].as_str().unwrap().contains("torres"));
    assert!(rows[0]["search_key"].as_str().unwrap().contains("torres"));
}

#[test]
fn variants_include_original_name() {
    let ws = Workspace::new();
    let out = ws.vinvegan(&["variants", "Frog's Leap Winery"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.starts_with("Frog's Leap Winery (short: "));
    assert!(text.lines().any(|l| l == "  frog's leap winery"));
}

#[test]
fn config_show_round_trips() {
    let ws = Workspace::new();
    let out = ws.vinvegan_with_policy(&["config", "show"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let shown = stdout(&out);
    let table: toml::Table = toml::from_str(&shown).unwrap();
    assert_eq!(table["name"].as_str(), Some("cli-test"));

    fs::write(ws.path().join("vinvegan.toml"), shown).unwrap();
    let out = ws.vinvegan(&["config", "path"]);
    assert_eq!(stdout(&out).trim(), "vinvegan.toml");
    let out = ws.vinvegan(&["config", "validate"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
}

#[test]
fn config_path_defaults() {
    let ws = Workspace::new();
    let out = ws.vinvegan(&["config", "path"]);
    assert_eq!(stdout(&out).trim(), "built-in defaults");
}
