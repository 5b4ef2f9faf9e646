//! # Rate Limit Rule Migrator
//!
//! Converts deprecated `cloudflare_rate_limit` Terraform resources into
//! `cloudflare_ruleset` rate limiting rules.
//!
//! Conversion is a two step pipeline:
//!
//! - **Extraction**: independent pattern lookups over the legacy rule text
//!   build a [`MigrationRecord`]. Unrecognised or missing fields fall back to
//!   defaults, so extraction never fails.
//! - **Rendering**: a [`RulePresenter`] renders the record with a fixed
//!   layout template.
//!
//! ## Example
//!
//! ```ignore
//! use ratelimit_migrator::{convert, TeraPresenter};
//!
//! let presenter = TeraPresenter::new()?;
//! let output = convert(&presenter, r#"
//!     threshold   = local.thresholds.thirty_requests
//!     period      = local.times.one_minute
//!     url_pattern = "api.example.net/*test/*"
//! "#)?;
//! ```

pub mod config;
pub mod error;
pub mod extraction;
pub mod lookup;
pub mod record;
pub mod render;
pub mod web;

pub use config::ServerConfig;
pub use error::{MigratorError, Result};
pub use extraction::{extract_record, wildcard_to_regex};
pub use record::{HeaderMatch, MatchOperator, MigrationRecord, Setting, UNKNOWN_MARKER};
pub use render::{convert, RulePresenter, TeraPresenter};
pub use web::{router, AppState};
