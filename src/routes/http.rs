// GET handlers: status page, version, api/state, api/view, api/stats

use askama::Template;
use axum::{extract::State, response::Html, response::IntoResponse};
use std::sync::atomic::Ordering;

use super::AppState;
use crate::version::{NAME, VERSION};
use crate::view::{DashboardTemplate, DashboardView};

fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation = "render_page", "template render failed");
        format!("<pre>Template error: {e}</pre>")
    }))
}

/// GET / — server-rendered status page; refreshes itself at the poll interval.
pub(super) async fn page_handler(State(state): State<AppState>) -> Html<String> {
    let view = DashboardView::from_snapshot(&state.state_rx.borrow());
    let refresh_secs = state.config.brain.poll_interval_ms.div_ceil(1000);
    render(DashboardTemplate::new(view, refresh_secs))
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/state — latest published snapshot (empty / NORMAL until the first successful poll).
pub(super) async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.state_rx.borrow().clone();
    axum::Json(snapshot)
}

pub(super) async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(DashboardView::from_snapshot(&state.state_rx.borrow()))
}

pub(super) async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "pollsSucceeded": state.stats.succeeded(),
        "pollsFailed": state.stats.failed(),
        "alertsRaised": state.stats.alerts(),
        "wsClients": state.ws_connections.load(Ordering::Relaxed),
        "brainUrl": state.config.brain.url,
    }))
}
