//! Web form for converting legacy rules.
//!
//! `GET /` serves the input form and `POST /` converts the submitted
//! `deprecated_rule` field and shows the result in a read-only text box.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tera::{Context, Tera};
use tower_http::trace::TraceLayer;

use crate::error::{MigratorError, Result};
use crate::render::{convert, RulePresenter};

const TPL_FORM: &str = include_str!("../templates/form.html");
const TPL_RESULT: &str = include_str!("../templates/result.html");

/// Shared state for the web handlers
#[derive(Clone)]
pub struct AppState {
    presenter: Arc<dyn RulePresenter>,
    pages: Arc<Tera>,
}

impl AppState {
    pub fn new(presenter: Arc<dyn RulePresenter>) -> Result<Self> {
        let mut pages = Tera::default();
        pages.add_raw_template("form.html", TPL_FORM)?;
        pages.add_raw_template("result.html", TPL_RESULT)?;

        Ok(Self {
            presenter,
            pages: Arc::new(pages),
        })
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form).post(convert_rule))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ConvertForm {
    #[serde(default)]
    pub deprecated_rule: String,
}

/// Input form
async fn show_form(State(state): State<AppState>) -> std::result::Result<Html<String>, AppError> {
    let page = state.pages.render("form.html", &Context::new())?;
    Ok(Html(page))
}

/// Convert the submitted rule and show the result page
async fn convert_rule(
    State(state): State<AppState>,
    Form(form): Form<ConvertForm>,
) -> std::result::Result<Html<String>, AppError> {
    tracing::info!(bytes = form.deprecated_rule.len(), "Converting legacy rule");

    let migrated = convert(state.presenter.as_ref(), &form.deprecated_rule)?;

    let mut context = Context::new();
    context.insert("migrated_rule", &migrated);
    let page = state.pages.render("result.html", &context)?;

    Ok(Html(page))
}

// Error handling

#[derive(Debug)]
pub struct AppError(MigratorError);

impl From<MigratorError> for AppError {
    fn from(err: MigratorError) -> Self {
        AppError(err)
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to convert rule: {}", self.0),
        )
            .into_response()
    }
}
