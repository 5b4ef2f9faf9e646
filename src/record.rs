//! Migration record produced by extraction and consumed by the presenter.
//!
//! Every field has a defined default so a record built from unrecognised
//! input is still complete and renderable.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Sentinel rendered in place of numeric settings that could not be parsed
pub const UNKNOWN_MARKER: &str = "[UNKNOWN]";

/// Description used when the legacy rule has none
pub const NO_DESCRIPTION: &str = "No description found";

/// Zone used when no `zone_id` map reference is present
pub const PLACEHOLDER_ZONE: &str = "example.com";

/// Header name handled by the counting expression instead of request matching
pub const CACHE_STATUS_HEADER: &str = "cf-cache-status";

/// Resource name given to every generated ruleset
pub const NEW_RESOURCE_NAME: &str = "auto_migrated_ruleset";

/// Zone id literal exposed to custom layouts as `zone_id`
pub const PLACEHOLDER_ZONE_ID: &str = "placeholder_zone";

/// A numeric rule setting, or the unknown-marker when it could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Setting {
    Known(u64),
    #[default]
    Unknown,
}

impl Setting {
    /// The resolved value, if any
    pub fn value(&self) -> Option<u64> {
        match self {
            Setting::Known(v) => Some(*v),
            Setting::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Setting::Unknown)
    }
}

impl From<u64> for Setting {
    fn from(value: u64) -> Self {
        Setting::Known(value)
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Known(v) => write!(f, "{}", v),
            Setting::Unknown => write!(f, "{}", UNKNOWN_MARKER),
        }
    }
}

// Known values serialize as integers, the marker as its string form.
impl Serialize for Setting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Setting::Known(v) => serializer.serialize_u64(*v),
            Setting::Unknown => serializer.serialize_str(UNKNOWN_MARKER),
        }
    }
}

/// Comparison used for host and path conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOperator {
    #[serde(rename = "eq")]
    Equals,
    #[serde(rename = "matches")]
    Matches,
}

impl MatchOperator {
    /// Get the operator keyword used in rule expressions
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOperator::Equals => "eq",
            MatchOperator::Matches => "matches",
        }
    }
}

impl fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One header condition copied from a legacy `headers` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMatch {
    pub name: String,
    /// Operator text as written in the legacy rule (`eq`, `ne`, ...)
    pub op: String,
    pub value: String,
}

impl HeaderMatch {
    pub fn new(name: impl Into<String>, op: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            value: value.into(),
        }
    }
}

/// Structured result of extracting one legacy rule.
///
/// Field names are the contract with the output template; rename them only
/// together with `templates/ruleset.tf.tera`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    pub new_resource_name: String,
    /// Fixed placeholder for custom layouts; the built-in layout references
    /// the zone through `zone_name` instead.
    pub zone_id: String,
    pub description: String,
    pub threshold: Setting,
    pub period: Setting,
    pub mitigation_timeout: Setting,
    pub zone_name: String,
    pub host_name: String,
    pub host_operator: MatchOperator,
    pub host_pattern: String,
    pub path_operator: MatchOperator,
    pub path_pattern: String,
    pub methods: Vec<String>,
    pub bypass_regex: String,
    pub request_headers: Vec<HeaderMatch>,
    pub response_headers: Vec<HeaderMatch>,
    pub counting_expression: String,
}

impl Default for MigrationRecord {
    fn default() -> Self {
        Self {
            new_resource_name: NEW_RESOURCE_NAME.to_string(),
            zone_id: PLACEHOLDER_ZONE_ID.to_string(),
            description: NO_DESCRIPTION.to_string(),
            threshold: Setting::Unknown,
            period: Setting::Unknown,
            mitigation_timeout: Setting::Unknown,
            zone_name: PLACEHOLDER_ZONE.to_string(),
            host_name: PLACEHOLDER_ZONE.to_string(),
            host_operator: MatchOperator::Equals,
            host_pattern: PLACEHOLDER_ZONE.to_string(),
            path_operator: MatchOperator::Matches,
            path_pattern: ".*".to_string(),
            methods: Vec::new(),
            bypass_regex: String::new(),
            request_headers: Vec::new(),
            response_headers: Vec::new(),
            counting_expression: String::new(),
        }
    }
}
