// src/handlers/global_wave.rs
use chrono::NaiveDate;
use futures::future::join_all;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::{BarTrace, FillStyle, GlobalWaveEvent, GlobalWaveSummary, Horizon, HorizonStats};
use crate::services::analytics::AnalyticsClient;
use crate::services::overlay::build_signal_overlay;
use crate::services::palette::{PEAK_COLOR, TROUGH_COLOR};
use crate::services::transforms::select_summaries;

use super::error::ApiError;
use super::split_selection;

#[derive(Debug, Deserialize)]
pub struct GlobalWaveQuery {
    pub factors: String,
    pub horizon: Option<u32>,
}

#[derive(Serialize)]
struct GlobalWaveResponse {
    factors: Vec<String>,
    bars: Vec<BarTrace>,
    rows: Vec<SummaryRow>,
}

/// Passthrough stats for the summary table; factors with no summary keep
/// their row with null stats.
#[derive(Serialize)]
struct SummaryRow {
    factor: String,
    trough: Option<HorizonStats>,
    peak: Option<HorizonStats>,
}

pub async fn get_global_wave(
    query: GlobalWaveQuery,
    client: Arc<AnalyticsClient>,
) -> Result<Json, Rejection> {
    let months = query.horizon.unwrap_or(6);
    let horizon = Horizon::from_months(months)
        .ok_or_else(|| ApiError::rejection(format!("horizon must be 6 or 12, got {}", months)))?;

    let order = split_selection(&query.factors);
    info!(
        "Handling Global Wave request for {} factors at {}",
        order.len(),
        horizon.label()
    );

    let summaries = fetch_summaries(&client, &order).await;
    let bars = select_summaries(&summaries, horizon, &order);

    let response = GlobalWaveResponse {
        bars: vec![
            BarTrace {
                trace_type: "bar",
                name: format!("Trough {}", horizon.label()),
                x: order.clone(),
                y: bars.trough,
                marker: FillStyle {
                    color: TROUGH_COLOR.to_string(),
                },
            },
            BarTrace {
                trace_type: "bar",
                name: format!("Peak {}", horizon.label()),
                x: order.clone(),
                y: bars.peak,
                marker: FillStyle {
                    color: PEAK_COLOR.to_string(),
                },
            },
        ],
        rows: order
            .iter()
            .map(|factor| {
                let summary = summaries.get(factor);
                SummaryRow {
                    factor: factor.clone(),
                    trough: summary.map(|s| s.summary.trough.clone()),
                    peak: summary.map(|s| s.summary.peak.clone()),
                }
            })
            .collect(),
        factors: order,
    };
    Ok(warp::reply::json(&response))
}

#[derive(Debug, Deserialize)]
pub struct SignalsQuery {
    pub benchmark: String,
    pub factors: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub async fn get_global_wave_signals(
    query: SignalsQuery,
    client: Arc<AnalyticsClient>,
) -> Result<Json, Rejection> {
    if query.benchmark.trim().is_empty() {
        return Err(ApiError::rejection("benchmark must not be empty"));
    }

    // The event calendar is shared across factors, so any loaded factor's
    // event list is representative; default to the benchmark's own.
    let sources = query
        .factors
        .as_deref()
        .map(split_selection)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| vec![query.benchmark.clone()]);

    info!(
        "Handling Global Wave signals request: benchmark {}, {} event sources",
        query.benchmark,
        sources.len()
    );

    let (benchmark, summaries) = tokio::join!(
        client.returns(&query.benchmark, query.start, query.end),
        fetch_summaries(&client, &sources),
    );

    let pool: Vec<GlobalWaveEvent> = sources
        .iter()
        .filter_map(|factor| summaries.get(factor))
        .filter_map(|summary| summary.events.clone())
        .flatten()
        .collect();

    let overlay = build_signal_overlay(&benchmark, &pool);
    Ok(warp::reply::json(&overlay))
}

async fn fetch_summaries(
    client: &AnalyticsClient,
    factors: &[String],
) -> HashMap<String, GlobalWaveSummary> {
    let fetched = join_all(factors.iter().map(|f| client.global_wave(f))).await;
    factors
        .iter()
        .zip(fetched)
        .filter_map(|(factor, summary)| summary.map(|s| (factor.clone(), s)))
        .collect()
}
