// src/handlers/performance.rs
use chrono::NaiveDate;
use futures::future::join_all;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::{LineTrace, MetricRow, ReturnSeries};
use crate::services::analytics::AnalyticsClient;
use crate::services::transforms::cumulate;

use super::split_selection;

/// Annualization frequency sent to the metrics endpoint (daily data).
const TRADING_DAYS_PER_YEAR: u32 = 252;

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub factors: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub rf: Option<f64>,
}

#[derive(Serialize)]
struct PerformanceResponse {
    series: Vec<LineTrace>,
    metrics: Vec<MetricRow>,
}

/// Cumulative-return line trace for one factor's series.
pub fn cumulative_trace(series: &ReturnSeries) -> LineTrace {
    LineTrace {
        trace_type: "scatter",
        mode: "lines",
        name: series.factor.clone(),
        x: series.dates.clone(),
        y: cumulate(&series.ret),
        line: None,
        hovertemplate: None,
    }
}

pub async fn get_performance(
    query: PerformanceQuery,
    client: Arc<AnalyticsClient>,
) -> Result<Json, Rejection> {
    let selection = split_selection(&query.factors);
    info!(
        "Handling performance request for {} factors over [{:?}, {:?}]",
        selection.len(),
        query.start,
        query.end
    );

    let rf = query.rf.unwrap_or(0.0);
    let (series, metrics) = tokio::join!(
        join_all(
            selection
                .iter()
                .map(|f| client.returns(f, query.start, query.end))
        ),
        client.metrics(
            &selection,
            query.start,
            query.end,
            rf,
            TRADING_DAYS_PER_YEAR
        ),
    );

    let response = PerformanceResponse {
        series: series.iter().map(cumulative_trace).collect(),
        metrics: metrics.into_iter().map(MetricRow::guarded).collect(),
    };
    Ok(warp::reply::json(&response))
}
