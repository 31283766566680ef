use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::date_util::parse_request_date;
use crate::error::Error;
use crate::query::StreamSelection;
use crate::EpicDash;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<EpicDash>,
    pub agent: Arc<mixtape_core::Agent>,
}

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        log::warn!("request failed ({}): {}", status.as_u16(), self.0);

        let body = serde_json::json!({ "detail": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

// Request field names mirror what the dashboard front-end sends.
#[derive(Debug, Deserialize)]
pub struct DateRangeRequest {
    #[serde(rename = "fromDate")]
    pub from_date: String,
    #[serde(rename = "toDate")]
    pub to_date: String,
}

#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    pub selected_stream: String,
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
}

impl StreamRequest {
    fn selection(&self) -> Result<StreamSelection, Error> {
        StreamSelection::from_str(&self.selected_stream)
    }

    fn window(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), Error> {
        let from = self.from_date.as_deref().map(parse_request_date).transpose()?;
        let to = self.to_date.as_deref().map(parse_request_date).transpose()?;
        Ok((from, to))
    }
}

pub async fn holidays(
    State(state): State<AppState>,
    Json(req): Json<DateRangeRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
    let from = parse_request_date(&req.from_date)?;
    let to = parse_request_date(&req.to_date)?;
    Ok(Json(state.app.holidays(from, to)))
}

pub async fn metrics(
    State(state): State<AppState>,
    Json(req): Json<StreamRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let selection = req.selection()?;
    let (from, to) = req.window()?;
    Ok(Json(state.app.metrics(selection, from, to).await?))
}

pub async fn updates(
    State(state): State<AppState>,
    Json(req): Json<StreamRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let selection = req.selection()?;
    let (from, to) = req.window()?;
    Ok(Json(state.app.updates(&state.agent, selection, from, to).await?))
}

pub async fn risk(
    State(state): State<AppState>,
    Json(req): Json<StreamRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let selection = req.selection()?;
    let (from, to) = req.window()?;
    Ok(Json(state.app.risk(&state.agent, selection, from, to).await?))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/holidays", post(holidays))
        .route("/metrics", post(metrics))
        .route("/updates", post(updates))
        .route("/risk", post(risk))
        .with_state(state)
}
