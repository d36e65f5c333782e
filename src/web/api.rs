use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::{Router, routing::get};
use serde::Serialize;
use tracing::warn;

use super::AppState;
use super::form::TravelForm;
use crate::FarescanError;
use crate::planner::SearchOutcome;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub kind: &'static str,
    pub message: String,
}

pub(crate) fn status_for(error: &FarescanError) -> StatusCode {
    match error {
        FarescanError::Unauthorized => StatusCode::FORBIDDEN,
        FarescanError::NoResults { .. } => StatusCode::NOT_FOUND,
        FarescanError::Validation { .. } => StatusCode::BAD_REQUEST,
        FarescanError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        FarescanError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for FarescanError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = ApiError {
            kind: self.kind(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

async fn search(
    State(state): State<AppState>,
    Query(form): Query<TravelForm>,
) -> Result<Json<SearchOutcome>, FarescanError> {
    let today = (state.today)();
    let request = form.resolve(today).to_request()?;
    match state.planner.search(&request, today).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            warn!("{} search failed: {}", request.mode.name(), e);
            Err(e)
        }
    }
}
