//! Request and response header conditions.
//!
//! Legacy rules write request header blocks with quoted keys
//! (`"name" = "..."`) and response header blocks with bare keys
//! (`name = "..."`). Both forms are read exactly as written; a block that
//! does not carry all of name, op and value is skipped.

use regex::Regex;
use std::sync::LazyLock;

use crate::record::{HeaderMatch, CACHE_STATUS_HEADER};

static REQUEST_HEADERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"headers\s*=\s*\[\s*([^\]]+)\]").unwrap());
static RESPONSE_HEADERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"response\s*\{\s*headers\s*=\s*\[\s*([^\]]+)\]").unwrap()
});
static BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{\s*(.*?)\s*\}").unwrap());

/// Key patterns for one header block layout
struct KeyPatterns {
    name: Regex,
    op: Regex,
    value: Regex,
}

impl KeyPatterns {
    fn new(quote: &str) -> Self {
        let key = |k: &str| {
            Regex::new(&format!(r#"{q}{k}{q}\s*=\s*"([^"]+)""#, q = quote, k = k)).unwrap()
        };
        Self {
            name: key("name"),
            op: key("op"),
            value: key("value"),
        }
    }

    fn parse(&self, block: &str) -> Option<HeaderMatch> {
        let get = |re: &Regex| re.captures(block).map(|caps| caps[1].to_string());
        Some(HeaderMatch {
            name: get(&self.name)?,
            op: get(&self.op)?,
            value: get(&self.value)?,
        })
    }
}

static QUOTED_KEYS: LazyLock<KeyPatterns> = LazyLock::new(|| KeyPatterns::new("\""));
static BARE_KEYS: LazyLock<KeyPatterns> = LazyLock::new(|| KeyPatterns::new(""));

fn parse_blocks(list: &str, keys: &KeyPatterns) -> Vec<HeaderMatch> {
    BLOCK
        .captures_iter(list)
        .filter_map(|caps| {
            let header = keys.parse(&caps[1]);
            if header.is_none() {
                tracing::debug!(block = &caps[1], "skipping incomplete header block");
            }
            header
        })
        .collect()
}

/// Header conditions from the first `headers = [...]` list.
///
/// Cache-status headers are left to the counting expression.
pub fn extract_request_headers(text: &str) -> Vec<HeaderMatch> {
    let Some(caps) = REQUEST_HEADERS.captures(text) else {
        tracing::debug!(field = "request_headers", "no value found, using default");
        return Vec::new();
    };

    parse_blocks(&caps[1], &QUOTED_KEYS)
        .into_iter()
        .filter(|header| !header.name.eq_ignore_ascii_case(CACHE_STATUS_HEADER))
        .collect()
}

/// Header conditions from `response { headers = [...] }`
pub fn extract_response_headers(text: &str) -> Vec<HeaderMatch> {
    let Some(caps) = RESPONSE_HEADERS.captures(text) else {
        tracing::debug!(field = "response_headers", "no value found, using default");
        return Vec::new();
    };

    parse_blocks(&caps[1], &BARE_KEYS)
}
