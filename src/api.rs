use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::calendar::{create_year_calendar, parse_year, CalendarMonth};
use crate::store::CsvSource;
use crate::types::{AppState, DailyTradeSummary, TradeRecord};

/// Query params for the calendar endpoint
#[derive(Debug, Deserialize)]
pub struct CalendarQueryParams {
    pub year: Option<String>,
    #[serde(rename = "csvPath")]
    pub csv_path: Option<String>,
}

/// Body for the CSV upload endpoint
#[derive(Debug, Deserialize)]
pub struct CalendarUploadBody {
    pub year: Option<i32>,
    #[serde(rename = "csvContent")]
    pub csv_content: String,
}

/// Calendar grid plus the year's trade data, the unit the frontend renders
#[derive(Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub months: Vec<CalendarMonth>,
    pub summaries: BTreeMap<String, DailyTradeSummary>,
    #[serde(rename = "tradesByDate")]
    pub trades_by_date: BTreeMap<String, Vec<TradeRecord>>,
}

fn bad_request(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

/// GET /api/calendar?year=&csvPath= - calendar grid with trade summaries
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CalendarQueryParams>,
) -> impl IntoResponse {
    let year = match parse_year(params.year.as_deref(), Local::now().year()) {
        Ok(year) => year,
        Err(e) => return bad_request(e.to_string()),
    };

    let source = match params.csv_path.as_deref() {
        Some(path) if !path.trim().is_empty() => CsvSource::Path(path.to_string()),
        _ => CsvSource::Default,
    };

    match state.store.trade_data_for_year(&source, year).await {
        Ok(data) => {
            let calendar = create_year_calendar(year);
            (
                StatusCode::OK,
                Json(serde_json::json!(CalendarResponse {
                    year,
                    months: calendar.months,
                    summaries: data.summaries,
                    trades_by_date: data.trades_by_date,
                })),
            )
        }
        Err(e) => bad_request(e.to_string()),
    }
}

/// POST /api/calendar/upload - calendar for an uploaded CSV body.
/// Uploaded content has no stable identity, so it is parsed per request
/// and never enters the cache.
pub async fn upload_calendar(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CalendarUploadBody>,
) -> impl IntoResponse {
    let year = body.year.unwrap_or_else(|| Local::now().year());
    if year <= 0 {
        return bad_request(format!("year must be a positive integer: {year}"));
    }

    let source = CsvSource::Inline(body.csv_content);
    match state.store.trade_data_for_year(&source, year).await {
        Ok(data) => {
            let calendar = create_year_calendar(year);
            (
                StatusCode::OK,
                Json(serde_json::json!(CalendarResponse {
                    year,
                    months: calendar.months,
                    summaries: data.summaries,
                    trades_by_date: data.trades_by_date,
                })),
            )
        }
        Err(e) => bad_request(e.to_string()),
    }
}
