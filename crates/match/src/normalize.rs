//! Company-name normalization.
//!
//! Two derived forms per name:
//!
//! - **canonical**: folded to ASCII, lower-cased, punctuation removed,
//!   abbreviations substituted, trailing legal-entity suffixes stripped.
//! - **search key**: the canonical form without stopword tokens. This is
//!   the string the similarity thresholds are applied to.
//!
//! Both are pure and idempotent.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::MatchPolicy;
use crate::error::MatchError;
use crate::stopwords::StopwordSet;

// ---------------------------------------------------------------------------
// Character level
// ---------------------------------------------------------------------------

/// NFKD-decompose, drop combining marks, map the few Latin letters that
/// have no decomposition, drop everything else outside ASCII.
pub fn fold_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfkd() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ß' => out.push_str("ss"),
            'ł' => out.push('l'),
            'Ł' => out.push('L'),
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            'þ' => out.push_str("th"),
            'Þ' => out.push_str("TH"),
            'ı' => out.push('i'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2019}' | '\u{2018}' => out.push('\''),
            _ => {}
        }
    }
    out
}

fn dotted_acronym() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9](?:\.[a-z0-9])+\.?$").unwrap())
}

/// Fold, lowercase and split into alphanumeric tokens.
///
/// `s.r.l.` style acronyms collapse to a single token; other punctuation
/// separates tokens, except apostrophes, quotes, commas and brackets which
/// are deleted outright.
pub fn tokenize(s: &str) -> Vec<String> {
    let folded = fold_diacritics(s).to_ascii_lowercase();

    let mut cleaned = String::with_capacity(folded.len());
    for c in folded.chars() {
        match c {
            'a'..='z' | '0'..='9' | '.' => cleaned.push(c),
            ',' | '\'' | '"' | '`' | '(' | ')' | '[' | ']' | '{' | '}' | '!' | '?' | '*' => {}
            _ => cleaned.push(' '),
        }
    }

    let mut tokens = Vec::new();
    for raw in cleaned.split_whitespace() {
        if dotted_acronym().is_match(raw) {
            tokens.push(raw.replace('.', ""));
        } else {
            tokens.extend(raw.split('.').filter(|t| !t.is_empty()).map(str::to_string));
        }
    }
    tokens
}

/// Abbreviated form as a single token: `az.agr.` → `azagr`.
fn abbreviation_token(value: &str) -> String {
    fold_diacritics(value)
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

// ---------------------------------------------------------------------------
// Abbreviation table
// ---------------------------------------------------------------------------

/// Phrase (token sequence) → abbreviation token.
///
/// Besides every configured key, the dotted spelling of a multi-token
/// abbreviation (`az. agr.`) is registered as a key for its own token, so
/// both spellings meet in the same canonical form.
fn compile_abbreviations(table: &BTreeMap<String, String>) -> HashMap<Vec<String>, String> {
    let mut compiled = HashMap::new();
    for (key, value) in table {
        let target = abbreviation_token(value);
        let key_tokens = tokenize(key);
        if target.is_empty() || key_tokens.is_empty() {
            continue;
        }
        let value_tokens = tokenize(value);
        if value_tokens.len() > 1 {
            compiled.entry(value_tokens).or_insert_with(|| target.clone());
        }
        compiled.insert(key_tokens, target);
    }
    compiled
}

/// Reject tables where an abbreviation's output is itself a key; those
/// would make substitution order-dependent.
pub(crate) fn check_abbreviations(table: &BTreeMap<String, String>) -> Result<(), MatchError> {
    let keys: BTreeSet<String> = table.keys().map(|k| tokenize(k).join(" ")).collect();
    for (key, value) in table {
        let target = abbreviation_token(value);
        if target.is_empty() {
            return Err(MatchError::ConfigValidation(format!(
                "abbreviation for '{key}' is empty"
            )));
        }
        if keys.contains(&target) && tokenize(key).join(" ") != target {
            return Err(MatchError::AbbreviationChain {
                from: key.clone(),
                to: value.clone(),
            });
        }
    }
    Ok(())
}

/// Every token an abbreviation key or output can produce.
pub(crate) fn abbreviation_vocabulary(table: &BTreeMap<String, String>) -> BTreeSet<String> {
    let mut words = BTreeSet::new();
    for (phrase, target) in compile_abbreviations(table) {
        words.extend(phrase);
        words.insert(target);
    }
    words
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Normalizer {
    abbreviations: HashMap<Vec<String>, String>,
    longest_phrase: usize,
    legal_suffixes: BTreeSet<String>,
    countries: BTreeMap<String, String>,
    stopwords: StopwordSet,
}

impl Normalizer {
    /// Normalizer with the policy's static stopwords only.
    pub fn from_policy(policy: &MatchPolicy) -> Self {
        Self::new(policy, BTreeSet::new())
    }

    /// Normalizer whose stopword set also includes `dynamic` (usually
    /// derived from token frequencies across both catalogs).
    pub fn new(policy: &MatchPolicy, dynamic: BTreeSet<String>) -> Self {
        let abbreviations = compile_abbreviations(&policy.normalization.abbreviations);
        let longest_phrase = abbreviations.keys().map(Vec::len).max().unwrap_or(1);
        let countries = policy
            .countries
            .translations
            .iter()
            .map(|(from, to)| (tokenize(from).join(" "), tokenize(to).join(" ")))
            .collect();

        Self {
            abbreviations,
            longest_phrase,
            legal_suffixes: policy
                .normalization
                .legal_suffixes
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
            countries,
            stopwords: StopwordSet::build(policy, dynamic),
        }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Canonical ("normalized") name.
    pub fn canonical(&self, name: &str) -> String {
        let tokens = self.substitute_abbreviations(tokenize(name));
        self.strip_legal_suffixes(tokens).join(" ")
    }

    /// Search key of a raw name: canonical form minus stopwords.
    pub fn search_key(&self, name: &str) -> String {
        self.search_key_from_canonical(&self.canonical(name))
    }

    /// Search key of an already canonical name. Falls back to the canonical
    /// form when every token is a stopword.
    pub fn search_key_from_canonical(&self, canonical: &str) -> String {
        let kept: Vec<&str> = canonical
            .split(' ')
            .filter(|t| !t.is_empty() && !self.stopwords.contains(t))
            .collect();
        if kept.is_empty() {
            canonical.to_string()
        } else {
            kept.join(" ")
        }
    }

    /// Comparable country key: folded, lower-cased, single-spaced.
    /// `None` for blank input.
    pub fn country_key(&self, country: &str) -> Option<String> {
        let key = tokenize(country).join(" ");
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// Translate a registry country key into the retailer's language.
    /// Returns `None` when the table has no entry.
    pub fn translate_country(&self, key: &str) -> Option<&str> {
        self.countries.get(key).map(String::as_str)
    }

    /// Whether `key` is already in the retailer's language.
    pub fn is_translated_country(&self, key: &str) -> bool {
        self.countries.values().any(|v| v == key)
    }

    fn substitute_abbreviations(&self, mut tokens: Vec<String>) -> Vec<String> {
        // Substitution can expose new phrases ("az agricola" → "az agr");
        // iterate to a fixed point. Validated tables converge quickly; the
        // bound guards hand-built policies.
        for _ in 0..tokens.len() + 2 {
            let mut changed = false;
            let mut out = Vec::with_capacity(tokens.len());
            let mut i = 0;
            while i < tokens.len() {
                let max = self.longest_phrase.min(tokens.len() - i);
                let mut consumed = 0;
                for len in (1..=max).rev() {
                    if let Some(target) = self.abbreviations.get(&tokens[i..i + len]) {
                        if len > 1 || tokens[i] != *target {
                            changed = true;
                        }
                        out.push(target.clone());
                        consumed = len;
                        break;
                    }
                }
                if consumed == 0 {
                    out.push(tokens[i].clone());
                    consumed = 1;
                }
                i += consumed;
            }
            tokens = out;
            if !changed {
                break;
            }
        }
        tokens
    }

    fn strip_legal_suffixes(&self, mut tokens: Vec<String>) -> Vec<String> {
        while tokens.len() > 1 {
            match tokens.last() {
                Some(last) if self.legal_suffixes.contains(last) => {
                    tokens.pop();
                }
                _ => break,
            }
        }
        tokens
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
