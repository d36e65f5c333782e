//! Shared-secret gate: every request must carry `?key=<secret>` when one is configured

use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use super::AppState;
use super::pages;
use crate::FarescanError;

#[derive(Debug, Deserialize)]
struct KeyParam {
    key: Option<String>,
}

/// The key from the query string, if any
pub(crate) fn provided_key(uri: &Uri) -> Option<String> {
    Query::<KeyParam>::try_from_uri(uri)
        .ok()
        .and_then(|Query(param)| param.key)
}

/// No configured key lets everything through
#[must_use]
pub fn key_matches(expected: Option<&str>, provided: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => provided == Some(expected),
    }
}

pub async fn require_access_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = provided_key(request.uri());
    if key_matches(state.access_key.as_deref(), provided.as_deref()) {
        return next.run(request).await;
    }

    warn!("Rejected {} {}: access key missing or wrong", request.method(), request.uri().path());
    let page = pages::forbidden_page(&FarescanError::Unauthorized.user_message());
    (StatusCode::FORBIDDEN, Html(page)).into_response()
}
