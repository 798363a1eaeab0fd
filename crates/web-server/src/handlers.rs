use crate::{error::AppError, AppState};
use analytics::{AnalyticsError, Forecast, Insights, Summary};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use core_types::Record;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RecordsRequest {
    pub records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub records: Vec<Record>,
    /// Falls back to the configured default when omitted.
    #[serde(default)]
    pub horizon: Option<i64>,
}

/// What the dashboard shows for the current record book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookAnalysis {
    pub records: Vec<Record>,
    pub summary: Summary,
    /// `None` until the book holds at least two records.
    pub insights: Option<Insights>,
}

/// # POST /api/summary
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordsRequest>, JsonRejection>,
) -> Result<Json<Summary>, AppError> {
    let Json(request) = payload?;
    Ok(Json(state.engine.summarize(&request.records)))
}

/// # POST /api/forecast
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<Forecast>, AppError> {
    let Json(request) = payload?;
    let horizon = request.horizon.unwrap_or(state.default_horizon);
    let forecast = state.engine.forecast(&request.records, horizon)?;
    Ok(Json(forecast))
}

/// # POST /api/insights
pub async fn insights(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordsRequest>, JsonRejection>,
) -> Result<Json<Insights>, AppError> {
    let Json(request) = payload?;
    Ok(Json(state.engine.insights(&request.records)?))
}

/// # GET /api/records
pub async fn list_records(State(state): State<Arc<AppState>>) -> Json<Vec<Record>> {
    Json(state.book.read().await.records().to_vec())
}

/// # POST /api/records
/// Appends one record to the book and returns the refreshed analysis.
///
/// The record is only kept if the book including it can be analysed; otherwise the
/// book is left unchanged and the error is returned.
pub async fn add_record(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Record>, JsonRejection>,
) -> Result<Json<BookAnalysis>, AppError> {
    let Json(record) = payload?;
    let analysis = {
        let mut book = state.book.write().await;
        let mut candidate = book.records().to_vec();
        candidate.push(record);
        let analysis = analyze(&state, candidate)?;
        book.push(record);
        analysis
    };
    tracing::info!(date = %record.date(), records = analysis.records.len(), "Record added.");
    Ok(Json(analysis))
}

/// # DELETE /api/records/last
pub async fn remove_last_record(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookAnalysis>, AppError> {
    let (removed, snapshot) = {
        let mut book = state.book.write().await;
        let removed = book.remove_last();
        (removed, book.records().to_vec())
    };
    match removed {
        Some(record) => tracing::info!(date = %record.date(), "Removed last record."),
        None => tracing::debug!("Remove requested on an empty record book."),
    }
    analyze(&state, snapshot).map(Json)
}

/// # DELETE /api/records
pub async fn clear_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookAnalysis>, AppError> {
    state.book.write().await.clear();
    tracing::info!("Record book cleared.");
    analyze(&state, Vec::new()).map(Json)
}

/// # GET /api/analysis
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookAnalysis>, AppError> {
    let snapshot = state.book.read().await.records().to_vec();
    analyze(&state, snapshot).map(Json)
}

/// Runs the engine on a snapshot of the book.
fn analyze(state: &AppState, records: Vec<Record>) -> Result<BookAnalysis, AppError> {
    let summary = state.engine.summarize(&records);
    let insights = match state.engine.insights(&records) {
        Ok(insights) => Some(insights),
        Err(AnalyticsError::InsufficientData(_)) => None,
        Err(e) => return Err(e.into()),
    };
    Ok(BookAnalysis {
        records,
        summary,
        insights,
    })
}
