//! Rendering migration records into `cloudflare_ruleset` declarations.
//!
//! The presenter is an explicit dependency: build one at start-up and hand
//! it to whatever needs to render (the web handlers, the CLI).

use std::path::Path;
use tera::{Context, Tera};

use crate::error::Result;
use crate::extraction::extract_record;
use crate::record::MigrationRecord;

/// Name the ruleset layout is registered under
pub const RULESET_TEMPLATE: &str = "ruleset.tf";

const TPL_RULESET: &str = include_str!("templates/ruleset.tf.tera");

/// Renders migration records into output text
pub trait RulePresenter: Send + Sync {
    /// Render a sequence of records; callers pass exactly one
    fn render(&self, records: &[MigrationRecord]) -> Result<String>;
}

/// Tera-backed presenter using a fixed layout template
pub struct TeraPresenter {
    tera: Tera,
}

impl TeraPresenter {
    /// Presenter with the built-in ruleset layout
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(RULESET_TEMPLATE, TPL_RULESET)?;
        Ok(Self { tera })
    }

    /// Presenter with a layout loaded from disk.
    ///
    /// The template receives the same `rules_data` context as the built-in one.
    pub fn from_template_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut tera = Tera::default();
        tera.add_template_file(path, Some(RULESET_TEMPLATE))?;
        tracing::info!("Loaded ruleset template from {}", path.display());
        Ok(Self { tera })
    }

    /// Built-in layout, or the one at `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_template_file(path),
            None => Self::new(),
        }
    }
}

impl RulePresenter for TeraPresenter {
    fn render(&self, records: &[MigrationRecord]) -> Result<String> {
        let mut context = Context::new();
        context.insert("rules_data", records);
        Ok(self.tera.render(RULESET_TEMPLATE, &context)?)
    }
}

/// Extract a legacy rule and render it as one ruleset declaration
pub fn convert(presenter: &dyn RulePresenter, text: &str) -> Result<String> {
    let record = extract_record(text);
    presenter.render(std::slice::from_ref(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{HeaderMatch, MatchOperator, Setting};

    fn sample() -> MigrationRecord {
        MigrationRecord {
            description: "Protect login".to_string(),
            threshold: Setting::Known(30),
            period: Setting::Known(60),
            mitigation_timeout: Setting::Known(120),
            zone_name: "example.net".to_string(),
            host_name: "api.example.net".to_string(),
            host_operator: MatchOperator::Equals,
            host_pattern: "api.example.net".to_string(),
            path_operator: MatchOperator::Matches,
            path_pattern: "/.*test/.*".to_string(),
            methods: vec!["GET".to_string(), "POST".to_string()],
            request_headers: vec![HeaderMatch::new("X-App", "eq", "mobile")],
            counting_expression: "(http.response.code in { 401 })".to_string(),
            ..MigrationRecord::default()
        }
    }

    #[test]
    fn test_render_builtin_layout() {
        let presenter = TeraPresenter::new().unwrap();
        let output = presenter.render(&[sample()]).unwrap();

        assert!(output.contains(r#"resource "cloudflare_ruleset" "auto_migrated_ruleset""#));
        assert!(output.contains(r#"var.cloudflare_domains_map["example.net"]"#));
        assert!(output.contains("requests_per_period = 30"));
        assert!(output.contains("period              = 60"));
        assert!(output.contains("mitigation_timeout  = 120"));
        assert!(output.contains(r#"http.host eq \"api.example.net\""#));
        assert!(output.contains(r#"http.request.uri.path matches \"/.*test/.*\""#));
        assert!(output.contains(r#"http.request.method in { \"GET\" \"POST\" }"#));
        assert!(output.contains(r#"any(http.request.headers[\"x-app\"][*] eq \"mobile\")"#));
        assert!(output.contains(r#"counting_expression = "(http.response.code in { 401 })""#));
    }

    #[test]
    fn test_render_unknown_markers() {
        let presenter = TeraPresenter::new().unwrap();
        let output = presenter.render(&[MigrationRecord::default()]).unwrap();

        assert!(output.contains("requests_per_period = [UNKNOWN]"));
        assert!(!output.contains("counting_expression"));
        assert!(!output.contains("http.request.method"));
    }

    #[test]
    fn test_counting_expression_quotes_escaped() {
        let record = MigrationRecord {
            counting_expression: r#"not (any(x == "hit"))"#.to_string(),
            ..MigrationRecord::default()
        };
        let output = TeraPresenter::new().unwrap().render(&[record]).unwrap();

        assert!(output.contains(r#"counting_expression = "not (any(x == \"hit\"))""#));
    }

    #[test]
    fn test_convert() {
        let presenter = TeraPresenter::new().unwrap();
        let output = convert(&presenter, "threshold = 8\nperiod = 10").unwrap();

        assert!(output.contains("requests_per_period = 8"));
        assert!(output.contains("period              = 10"));
    }
}
