//! Counting expression synthesis.
//!
//! The legacy rule's response `statuses` list and its cache-status header
//! condition become clauses of the ruleset's `counting_expression`.

use regex::Regex;
use std::sync::LazyLock;

use crate::record::CACHE_STATUS_HEADER;

static STATUSES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"statuses\s*=\s*\[([^\]]+)\]").unwrap());
static STATUS_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());
static CACHE_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)"name"\s*=\s*"Cf-Cache-Status".*?"op"\s*=\s*"([^"]+)".*?"value"\s*=\s*"([^"]+)""#,
    )
    .unwrap()
});

/// `(http.response.code in { ... })` for a non-empty `statuses` list
fn status_clause(text: &str) -> Option<String> {
    let list = STATUSES.captures(text)?.get(1)?.as_str();
    let codes: Vec<&str> = STATUS_CODE.find_iter(list).map(|m| m.as_str()).collect();
    if codes.is_empty() {
        return None;
    }
    Some(format!("(http.response.code in {{ {} }})", codes.join(" ")))
}

/// Clause for a `Cf-Cache-Status` header condition.
///
/// Header values may arrive in either case, so both the lowercase and the
/// uppercase form of the value are tested.
fn cache_status_clause(text: &str) -> Option<String> {
    let caps = CACHE_STATUS.captures(text)?;
    let op = &caps[1];
    let lower = caps[2].to_lowercase();
    let upper = lower.to_uppercase();
    let header = format!(r#"http.response.headers["{}"][*]"#, CACHE_STATUS_HEADER);

    match op {
        "eq" => Some(format!(
            r#"not (any({h} == "{lower}") or any({h} == "{upper}"))"#,
            h = header
        )),
        "ne" => Some(format!(
            r#"(any({h} != "{lower}") and any({h} != "{upper}"))"#,
            h = header
        )),
        other => {
            tracing::debug!(op = other, "unsupported cache-status operator");
            None
        }
    }
}

/// Combine the status and cache-status clauses with `and`.
///
/// Returns an empty string when neither source is present.
pub fn build_counting_expression(text: &str) -> String {
    let clauses: Vec<String> = [status_clause(text), cache_status_clause(text)]
        .into_iter()
        .flatten()
        .collect();
    if clauses.is_empty() {
        tracing::debug!(field = "counting_expression", "no value found, using default");
    }
    clauses.join(" and ")
}
