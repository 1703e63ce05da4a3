// src/models.rs
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::services::transforms::guard;

/// Daily return series for one factor, as served by the analytics backend.
/// Dates are trading days in strictly increasing order; returns are decimal
/// fractions (0.01 = 1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub factor: String,
    pub dates: Vec<NaiveDate>,
    pub ret: Vec<f64>,
}

impl ReturnSeries {
    pub fn empty(factor: impl Into<String>) -> Self {
        Self {
            factor: factor.into(),
            dates: Vec::new(),
            ret: Vec::new(),
        }
    }

    /// Enforces the one-return-per-trading-day invariant. A payload whose
    /// lengths disagree degrades to an empty series rather than feeding a
    /// misaligned chart.
    pub fn sanitized(self) -> Self {
        if self.dates.len() != self.ret.len() {
            warn!(
                "Return series for {} has {} dates but {} returns, dropping",
                self.factor,
                self.dates.len(),
                self.ret.len()
            );
            return Self::empty(self.factor);
        }
        self
    }
}

/// Annualized metrics for one factor over the selected window. Passed
/// through to the metrics table; only the nullable Sharpe needs guarding
/// (the backend reports null when volatility is zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRow {
    pub factor: String,
    pub ann_return: f64,
    pub ann_vol: f64,
    pub sharpe: Option<f64>,
    pub maxdd: f64,
}

impl MetricRow {
    pub fn guarded(mut self) -> Self {
        self.sharpe = guard(self.sharpe);
        self
    }
}

/// Trailing-12-month ranked return grid. `ranked_factors[month][rank]` and
/// `ranked_returns[month][rank]` carry the per-month ranking; `factors` is
/// the authoritative label list used for stable color coding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPayload {
    pub months: Vec<String>,
    pub ranked_factors: Vec<Vec<String>>,
    pub ranked_returns: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub factors: Vec<String>,
}

impl HeatmapPayload {
    /// Authoritative factor list: the backend's `factors` field when present,
    /// otherwise the grid labels in first-appearance order.
    pub fn factor_list(&self) -> Vec<String> {
        if !self.factors.is_empty() {
            return self.factors.clone();
        }
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for column in &self.ranked_factors {
            for label in column {
                if seen.insert(label.clone()) {
                    out.push(label.clone());
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Trough,
    Peak,
}

/// One macro-regime inflection point. The calendar date need not be a
/// trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalWaveEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub date: NaiveDate,
    pub r_6m: Option<f64>,
    pub r_12m: Option<f64>,
}

/// Post-event aggregates for one event kind. Averages are null when no
/// event has enough forward history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonStats {
    pub n_events: u32,
    pub n_6m: u32,
    pub n_12m: u32,
    pub avg_6m: Option<f64>,
    pub avg_12m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSummary {
    pub trough: HorizonStats,
    pub peak: HorizonStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalWaveSummary {
    pub factor: String,
    pub summary: WaveSummary,
    pub events: Option<Vec<GlobalWaveEvent>>,
}

/// Forward window over which post-event average returns are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    SixMonths,
    TwelveMonths,
}

impl Horizon {
    pub fn from_months(months: u32) -> Option<Self> {
        match months {
            6 => Some(Self::SixMonths),
            12 => Some(Self::TwelveMonths),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SixMonths => "+6M",
            Self::TwelveMonths => "+12M",
        }
    }
}

// ---- Chart-ready structures ----
//
// These serialize directly to the trace/shape JSON the Plotly-style
// rendering surface consumes, so field names follow that wire format.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerStyle {
    pub symbol: &'static str,
    pub size: u32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FillStyle {
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub marker: MarkerStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub marker: FillStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub z: Vec<Vec<i32>>,
    pub x: Vec<String>,
    pub y: Vec<u32>,
    pub text: Vec<Vec<String>>,
    pub colorscale: Vec<(f64, String)>,
    pub zmin: f64,
    pub zmax: f64,
    pub showscale: bool,
    pub hovertemplate: String,
}

/// Dotted vertical line spanning the full plot height, anchored at an
/// event's original calendar date (not the aligned trading day).
#[derive(Debug, Clone, Serialize)]
pub struct VerticalGuide {
    #[serde(rename = "type")]
    pub shape_type: &'static str,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x0: NaiveDate,
    pub x1: NaiveDate,
    pub y0: f64,
    pub y1: f64,
    pub line: LineStyle,
}
