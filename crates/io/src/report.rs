// HTML report rendering

use std::collections::BTreeSet;
use std::fmt::Write;

use serde_json::Value;
use vinvegan_match::config::{MatchPolicy, ReportConfig, RetailerColumns};
use vinvegan_match::model::{MatchResult, MatchedCompany, Product};

/// What a report line needs to know about one matched company.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// Name shown in the link text (the registry's spelling).
    pub name: String,
    /// Name searched for at the retailer (the retailer's spelling).
    pub search_name: String,
    pub products: Vec<Product>,
}

impl ReportEntry {
    pub fn from_match(matched: &MatchedCompany) -> Self {
        Self {
            name: matched.registry.name.clone(),
            search_name: matched.best.name.clone(),
            products: matched.products.clone(),
        }
    }

    /// Entry from a record of a written result file. `None` when the record
    /// has no company name.
    pub fn from_record(record: &Value) -> Option<Self> {
        let name = record.get("company_name")?.as_str()?.to_string();
        let search_name = record
            .get("retailer_company_name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        let products = record
            .get("products_found_at_retailer")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        Some(Self { name, search_name, products })
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Retailer search link for an exact (quoted) name.
pub fn search_url(template: &str, name: &str) -> String {
    let quoted = format!("\"{}\"", name.trim());
    let query: String = url::form_urlencoded::byte_serialize(quoted.as_bytes()).collect();
    template.replace("{query}", &query)
}

/// Sorted, de-duplicated enumeration: `a`, `a og b`, `a, b og c`.
pub fn pretty_join<I, S>(items: I, conjunction: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let terms: BTreeSet<String> = items
        .into_iter()
        .map(|s| s.as_ref().trim().trim_end_matches(',').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let terms: Vec<String> = terms.into_iter().collect();

    match terms.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} {} {}", init.join(", "), conjunction, last),
    }
}

/// `Land/Distrikt`, or just the country when the district is blank or the
/// catch-all value.
fn region(product: &Product, columns: &RetailerColumns, ignored: &str) -> Option<String> {
    let country = product.get(&columns.country)?;
    match product.get(&columns.region) {
        Some(district) if district != ignored => Some(format!("{country}/{district}")),
        _ => Some(country.to_string()),
    }
}

/// One `<li>` body: link, product count, selection, types and regions.
pub fn company_line(entry: &ReportEntry, policy: &MatchPolicy) -> String {
    let report = &policy.report;
    let columns = &policy.retailer.columns;

    let href = escape_html(&search_url(&report.search_url_template, &entry.search_name));
    let mut line = format!("<a href='{}'>{}</a>", href, escape_html(&entry.name));

    if entry.products.is_empty() {
        line.push('.');
        return line;
    }

    let _ = write!(line, ". {} {}.", entry.products.len(), escape_html(&report.products_label));

    let selections: Vec<&str> =
        entry.products.iter().filter_map(|p| p.get(&columns.selection)).collect();
    if selections.iter().any(|s| *s == report.highlight_selection) {
        let _ = write!(line, " <b>{}</b>.", escape_html(&report.highlight_selection));
    } else if !selections.is_empty() {
        let _ = write!(line, " {}.", escape_html(&pretty_join(&selections, &report.conjunction)));
    }

    let types = pretty_join(
        entry.products.iter().filter_map(|p| p.get(&columns.kind)),
        &report.conjunction,
    );
    let regions = pretty_join(
        entry.products.iter().filter_map(|p| region(p, columns, &report.ignored_region)),
        &report.conjunction,
    );
    match (types.is_empty(), regions.is_empty()) {
        (false, false) => {
            let _ = write!(
                line,
                " {} {} {}.",
                escape_html(&types),
                escape_html(&report.origin_word),
                escape_html(&regions)
            );
        }
        (false, true) => {
            let _ = write!(line, " {}.", escape_html(&types));
        }
        (true, false) => {
            let origin = escape_html(&report.origin_word);
            let _ = write!(line, " {} {}.", origin, escape_html(&regions));
        }
        (true, true) => {}
    }
    line
}

/// `<h1>` heading followed by a `<ul>` with one item per entry.
pub fn render_section(heading: &str, entries: &[ReportEntry], policy: &MatchPolicy) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(heading));
    html.push_str("<ul>\n");
    for entry in entries {
        let _ = writeln!(html, "<li>{}</li>", company_line(entry, policy));
    }
    html.push_str("</ul>\n");
    html
}

/// Both sections as one HTML fragment.
pub fn render(
    vegan_friendly: &[ReportEntry],
    some_vegan_options: &[ReportEntry],
    policy: &MatchPolicy,
) -> String {
    let ReportConfig { vegan_friendly_heading, some_vegan_options_heading, .. } = &policy.report;
    let mut html = render_section(vegan_friendly_heading, vegan_friendly, policy);
    html.push('\n');
    html.push_str(&render_section(some_vegan_options_heading, some_vegan_options, policy));
    html
}

pub fn render_result(result: &MatchResult, policy: &MatchPolicy) -> String {
    let entries =
        |list: &[MatchedCompany]| list.iter().map(ReportEntry::from_match).collect::<Vec<_>>();
    render(&entries(&result.vegan_friendly), &entries(&result.some_vegan_options), policy)
}
