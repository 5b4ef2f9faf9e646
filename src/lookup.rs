//! Symbolic name tables used by legacy rules.
//!
//! Legacy rules reference shared Terraform locals such as
//! `local.thresholds.thirty_requests` or `local.times.one_minute`
//! instead of literal numbers. These tables resolve the known names.

use crate::record::Setting;

/// `local.thresholds.*` names
pub const THRESHOLDS: &[(&str, u64)] = &[
    ("eight_requests", 8),
    ("five_requests", 5),
    ("three_requests", 3),
    ("four_requests", 4),
    ("ten_requests", 10),
    ("twenty_requests", 20),
    ("twelve_requests", 12),
    ("thirty_requests", 30),
    ("fifty_requests", 50),
];

/// `local.times.*` names accepted for `period`
pub const PERIODS: &[(&str, u64)] = &[
    ("ten_secs", 10),
    ("one_minute", 60),
    ("five_minutes", 300),
];

/// `local.times.*` names accepted for `timeout`
pub const TIMEOUTS: &[(&str, u64)] = &[
    ("two_minutes", 120),
    ("five_minutes", 300),
];

/// Resolve a symbolic name, yielding the unknown-marker on a miss
pub fn lookup(table: &[(&str, u64)], name: &str) -> Setting {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| Setting::Known(*value))
        .unwrap_or(Setting::Unknown)
}
