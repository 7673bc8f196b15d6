//! `vinvegan check-urls`: which registry websites are missing or down.

use std::path::PathBuf;
use std::time::Duration;

use scraper::{Html, Selector};
use vinvegan_match::Company;

use crate::catalog::load_registry;
use crate::exit_codes::{EXIT_ERROR, EXIT_URLS_BROKEN};
use crate::CliError;

const USER_AGENT: &str = concat!("vinvegan/", env!("CARGO_PKG_VERSION"));

// ── Outcome ─────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub enum UrlCheck {
    /// No website listed.
    Missing,
    /// Page fetched; title if it had one.
    Ok { title: Option<String> },
    /// Network error or non-success status.
    Failed { error: String },
}

impl UrlCheck {
    fn is_broken(&self) -> bool {
        !matches!(self, Self::Ok { .. })
    }
}

// ── Fetching ────────────────────────────────────────────────────────

pub struct SiteChecker {
    http: reqwest::blocking::Client,
    title: Selector,
}

impl SiteChecker {
    pub fn new(timeout: Duration) -> Result<Self, CliError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot build HTTP client: {e}")))?;
        let title = Selector::parse("title")
            .map_err(|e| CliError::general(format!("title selector: {e}")))?;
        Ok(Self { http, title })
    }

    /// Text of the first `<title>` element, entities decoded and whitespace
    /// collapsed.
    pub fn page_title(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let raw: String = document.select(&self.title).next()?.text().collect();
        let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        (!title.is_empty()).then_some(title)
    }

    pub fn check(&self, url: Option<&str>) -> UrlCheck {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return UrlCheck::Missing;
        };
        let target = with_scheme(url);
        let response = match self.http.get(&target).send() {
            Ok(resp) => resp,
            Err(e) => return UrlCheck::Failed { error: e.to_string() },
        };
        let status = response.status();
        if !status.is_success() {
            return UrlCheck::Failed { error: format!("HTTP {}", status.as_u16()) };
        }
        match response.text() {
            Ok(body) => UrlCheck::Ok { title: self.page_title(&body) },
            Err(e) => UrlCheck::Failed { error: e.to_string() },
        }
    }
}

/// Registry URLs are often bare host names.
pub fn with_scheme(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => url.to_string(),
        _ => format!("http://{url}"),
    }
}

fn outcome_line(company: &Company, check: &UrlCheck) -> String {
    let color = company.rating.as_deref().unwrap_or("");
    match check {
        UrlCheck::Missing => format!("Missing 'url' key;color={};id={}", color, company.id),
        UrlCheck::Failed { error } => {
            format!("Website retrieval error;color={};id={};{}", color, company.id, error)
        }
        UrlCheck::Ok { title } => format!(
            "Ok;color={};id={};{}",
            color,
            company.id,
            title.as_deref().unwrap_or("")
        ),
    }
}

pub fn cmd_check_urls(registry: PathBuf, timeout: u64, strict: bool) -> Result<(), CliError> {
    let companies = load_registry(&registry)?;
    let checker = SiteChecker::new(Duration::from_secs(timeout))?;

    let mut broken = 0usize;
    for company in &companies {
        let check = checker.check(company.url.as_deref());
        if check.is_broken() {
            broken += 1;
            println!("{}", outcome_line(company, &check));
        } else {
            log::debug!("{}", outcome_line(company, &check));
        }
    }

    eprintln!("checked {} websites, {} missing or unreachable", companies.len(), broken);
    if strict && broken > 0 {
        return Err(CliError::new(
            EXIT_URLS_BROKEN,
            format!("{broken} registry websites are missing or unreachable"),
        ));
    }
    Ok(())
}
