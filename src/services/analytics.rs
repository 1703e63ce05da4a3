// src/services/analytics.rs
//
// HTTP client for the analytics backend. Every public method degrades its
// section to an explicit empty state on transport or parse failure; faults
// are logged here and never propagate past this module.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::{GlobalWaveSummary, HeatmapPayload, MetricRow, ReturnSeries};

#[derive(Debug, Deserialize)]
struct FactorsPayload {
    factors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MetricsPayload {
    rows: Vec<MetricRow>,
}

#[derive(Debug, Serialize)]
struct MetricsRequest<'a> {
    factors: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<NaiveDate>,
    rf: f64,
    freq: u32,
}

pub struct AnalyticsClient {
    base_url: String,
    http: Client,
}

impl AnalyticsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Full catalog of selectable factors; empty on failure.
    pub async fn factors(&self) -> Vec<String> {
        match self.fetch_factors().await {
            Ok(factors) => factors,
            Err(e) => {
                error!("Factor catalog fetch failed: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_factors(&self) -> Result<Vec<String>> {
        let url = format!("{}/factors", self.base_url);
        info!("Fetching factor catalog from {}", url);
        let payload: FactorsPayload = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {}", url))?
            .json()
            .await
            .context("parsing factor catalog")?;
        Ok(payload.factors)
    }

    /// Daily return series for one factor, clipped to [start, end] by the
    /// backend when bounds are given; empty series on failure.
    pub async fn returns(
        &self,
        factor: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ReturnSeries {
        match self.fetch_returns(factor, start, end).await {
            Ok(series) => series.sanitized(),
            Err(e) => {
                error!("Return series fetch failed for {}: {:#}", factor, e);
                ReturnSeries::empty(factor)
            }
        }
    }

    async fn fetch_returns(
        &self,
        factor: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<ReturnSeries> {
        let url = format!("{}/returns", self.base_url);
        let mut query: Vec<(&str, String)> = vec![("factor", factor.to_string())];
        if let Some(start) = start {
            query.push(("start", start.to_string()));
        }
        if let Some(end) = end {
            query.push(("end", end.to_string()));
        }
        let series = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {} for {}", url, factor))?
            .json()
            .await
            .with_context(|| format!("parsing return series for {}", factor))?;
        Ok(series)
    }

    /// Annualized metric rows for the selection; empty on failure.
    pub async fn metrics(
        &self,
        factors: &[String],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        rf: f64,
        freq: u32,
    ) -> Vec<MetricRow> {
        match self.fetch_metrics(factors, start, end, rf, freq).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Metrics fetch failed: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_metrics(
        &self,
        factors: &[String],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        rf: f64,
        freq: u32,
    ) -> Result<Vec<MetricRow>> {
        let url = format!("{}/metrics", self.base_url);
        let body = MetricsRequest {
            factors,
            start,
            end,
            rf,
            freq,
        };
        let payload: MetricsPayload = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("POST {}", url))?
            .json()
            .await
            .context("parsing metric rows")?;
        Ok(payload.rows)
    }

    /// Trailing-12-month ranked heatmap payload; None on failure so the
    /// section renders its not-available state.
    pub async fn heatmap_12m(&self) -> Option<HeatmapPayload> {
        match self.fetch_heatmap_12m().await {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!("Heatmap fetch failed: {:#}", e);
                None
            }
        }
    }

    async fn fetch_heatmap_12m(&self) -> Result<HeatmapPayload> {
        let url = format!("{}/heatmap/12m", self.base_url);
        let payload = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {}", url))?
            .json()
            .await
            .context("parsing heatmap payload")?;
        Ok(payload)
    }

    /// Peak/trough summary (and optional event list) for one factor; None
    /// on failure.
    pub async fn global_wave(&self, factor: &str) -> Option<GlobalWaveSummary> {
        match self.fetch_global_wave(factor).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!("Global Wave fetch failed for {}: {:#}", factor, e);
                None
            }
        }
    }

    async fn fetch_global_wave(&self, factor: &str) -> Result<GlobalWaveSummary> {
        let url = format!("{}/global-wave", self.base_url);
        let summary = self
            .http
            .get(&url)
            .query(&[("factor", factor)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {} for {}", url, factor))?
            .json()
            .await
            .with_context(|| format!("parsing Global Wave summary for {}", factor))?;
        Ok(summary)
    }
}
