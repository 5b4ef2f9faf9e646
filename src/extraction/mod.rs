//! Field extraction from legacy `cloudflare_rate_limit` rule text.
//!
//! Each field is read by its own pure function over the raw text. The
//! functions share no state and never fail: a missing or malformed source
//! pattern yields the field's documented default. [`extract_record`]
//! composes them into a [`MigrationRecord`].

mod counting;
mod headers;

use regex::Regex;
use std::sync::LazyLock;

use crate::lookup::{self, PERIODS, THRESHOLDS, TIMEOUTS};
use crate::record::{MatchOperator, MigrationRecord, Setting, NO_DESCRIPTION, PLACEHOLDER_ZONE};

pub use counting::build_counting_expression;
pub use headers::{extract_request_headers, extract_response_headers};

static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"description\s*=\s*"([^"]+)""#).unwrap());

static THRESHOLD_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"threshold\s*=\s*local\.thresholds\.(\w+)").unwrap());
static THRESHOLD_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"threshold\s*=\s*([0-9]+)").unwrap());

static PERIOD_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"period\s*=\s*local\.times\.(\w+)").unwrap());
static PERIOD_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"period\s*=\s*([0-9]+)").unwrap());

static TIMEOUT_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"timeout\s*=\s*local\.times\.(\w+)").unwrap());
static ACTION_TIMEOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"action\s*\{[^}]*timeout\s*=\s*([0-9]+)").unwrap());
static TIMEOUT_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"timeout\s*=\s*([0-9]+)").unwrap());

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url_pattern\s*=\s*"([^"]+)""#).unwrap());
static ZONE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"zone_id\s*=\s*var\.cloudflare_domains_map\["([^"]+)"\]"#).unwrap()
});

static BYPASS_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bypass_url_patterns\s*=\s*\[([^\]]+)\]").unwrap());
static METHODS_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"methods\s*=\s*\[([^\]]+)\]").unwrap());
static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

/// Extract a complete migration record from legacy rule text
pub fn extract_record(text: &str) -> MigrationRecord {
    let target = extract_url_target(text);

    // The zone reference always replaces the host-derived guess, even when
    // it is absent and the placeholder is used instead.
    let zone_name = extract_zone_name(text);
    if let Some(guess) = &target.zone_guess {
        if *guess != zone_name {
            tracing::debug!(guess = %guess, zone = %zone_name, "host-derived zone replaced");
        }
    }

    let record = MigrationRecord {
        description: extract_description(text),
        threshold: extract_threshold(text),
        period: extract_period(text),
        mitigation_timeout: extract_mitigation_timeout(text),
        zone_name,
        host_name: target.host_name,
        host_operator: target.host_operator,
        host_pattern: target.host_pattern,
        path_operator: target.path_operator,
        path_pattern: target.path_pattern,
        methods: extract_methods(text),
        bypass_regex: extract_bypass_regex(text),
        request_headers: extract_request_headers(text),
        response_headers: extract_response_headers(text),
        counting_expression: build_counting_expression(text),
        ..MigrationRecord::default()
    };

    tracing::debug!(
        threshold = %record.threshold,
        period = %record.period,
        timeout = %record.mitigation_timeout,
        zone = %record.zone_name,
        "extracted migration record"
    );

    record
}

/// Replace every `*` wildcard with the regex `.*`
pub fn wildcard_to_regex(pattern: &str) -> String {
    pattern.replace('*', ".*")
}

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn missing<T>(field: &str, default: T) -> T {
    tracing::debug!(field, "no value found, using default");
    default
}

fn parse_literal(re: &Regex, text: &str) -> Option<Setting> {
    first_capture(re, text).map(|digits| {
        digits
            .parse::<u64>()
            .map(Setting::Known)
            .unwrap_or(Setting::Unknown)
    })
}

/// Resolve a numeric setting: a symbolic reference wins over a literal, even
/// when the symbolic name is not in the table.
fn resolve_setting(
    field: &str,
    text: &str,
    symbol: &Regex,
    table: &[(&str, u64)],
    literals: &[&Regex],
) -> Setting {
    if let Some(name) = first_capture(symbol, text) {
        let value = lookup::lookup(table, name);
        if value.is_unknown() {
            tracing::debug!(field, name, "unrecognised symbolic name");
        }
        return value;
    }

    literals
        .iter()
        .find_map(|re| parse_literal(re, text))
        .unwrap_or_else(|| missing(field, Setting::Unknown))
}

/// First quoted `description = "..."` value
pub fn extract_description(text: &str) -> String {
    first_capture(&DESCRIPTION, text)
        .unwrap_or_else(|| missing("description", NO_DESCRIPTION))
        .to_string()
}

/// Request threshold from `local.thresholds.*` or a literal
pub fn extract_threshold(text: &str) -> Setting {
    resolve_setting("threshold", text, &THRESHOLD_SYMBOL, THRESHOLDS, &[&*THRESHOLD_LITERAL])
}

/// Measurement period in seconds from `local.times.*` or a literal
pub fn extract_period(text: &str) -> Setting {
    resolve_setting("period", text, &PERIOD_SYMBOL, PERIODS, &[&*PERIOD_LITERAL])
}

/// Mitigation timeout in seconds.
///
/// Looks for `local.times.*` first, then a literal inside the `action`
/// block, then any literal `timeout = N`.
pub fn extract_mitigation_timeout(text: &str) -> Setting {
    resolve_setting(
        "mitigation_timeout",
        text,
        &TIMEOUT_SYMBOL,
        TIMEOUTS,
        &[&*ACTION_TIMEOUT, &*TIMEOUT_LITERAL],
    )
}

/// Host and path conditions derived from `url_pattern`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTarget {
    pub host_name: String,
    pub host_operator: MatchOperator,
    pub host_pattern: String,
    pub path_operator: MatchOperator,
    pub path_pattern: String,
    /// Last two labels of the host; superseded by [`extract_zone_name`]
    pub zone_guess: Option<String>,
}

impl Default for UrlTarget {
    fn default() -> Self {
        Self {
            host_name: PLACEHOLDER_ZONE.to_string(),
            host_operator: MatchOperator::Equals,
            host_pattern: PLACEHOLDER_ZONE.to_string(),
            path_operator: MatchOperator::Matches,
            path_pattern: ".*".to_string(),
            zone_guess: None,
        }
    }
}

/// Split `url_pattern = "host/path"` on the first `/`
pub fn extract_url_target(text: &str) -> UrlTarget {
    let Some(pattern) = first_capture(&URL_PATTERN, text) else {
        return missing("url_pattern", UrlTarget::default());
    };

    let (host, path) = pattern.split_once('/').unwrap_or((pattern, ""));

    let labels: Vec<&str> = host.split('.').collect();
    let zone_guess = labels[labels.len().saturating_sub(2)..].join(".");

    let (host_operator, host_pattern) = if host.contains('*') {
        (MatchOperator::Matches, wildcard_to_regex(host))
    } else {
        (MatchOperator::Equals, host.to_string())
    };

    let path = format!("/{}", path);
    let (path_operator, path_pattern) = if path.contains('*') {
        (MatchOperator::Matches, wildcard_to_regex(&path))
    } else {
        (MatchOperator::Equals, path)
    };

    UrlTarget {
        host_name: host.to_string(),
        host_operator,
        host_pattern,
        path_operator,
        path_pattern,
        zone_guess: Some(zone_guess),
    }
}

/// Zone from `zone_id = var.cloudflare_domains_map["<zone>"]`
pub fn extract_zone_name(text: &str) -> String {
    first_capture(&ZONE_ID, text)
        .unwrap_or_else(|| missing("zone_name", PLACEHOLDER_ZONE))
        .to_string()
}

/// First entry of `bypass_url_patterns`, wildcards translated.
///
/// Later entries are ignored; the target rule carries a single bypass regex.
pub fn extract_bypass_regex(text: &str) -> String {
    first_capture(&BYPASS_LIST, text)
        .and_then(|list| first_capture(&QUOTED, list))
        .map(wildcard_to_regex)
        .unwrap_or_else(|| missing("bypass_regex", String::new()))
}

/// Uppercased entries of `methods = [...]`
pub fn extract_methods(text: &str) -> Vec<String> {
    first_capture(&METHODS_LIST, text)
        .map(|list| {
            QUOTED
                .captures_iter(list)
                .map(|caps| caps[1].to_uppercase())
                .collect()
        })
        .unwrap_or_else(|| missing("methods", Vec::new()))
}
