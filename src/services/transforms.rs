// src/services/transforms.rs
//
// Pure transforms between backend analytics payloads and chart-ready
// structures. Everything here is deterministic and total: any well-formed
// input (including empty sequences and all-absent grids) produces a
// well-formed output.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{GlobalWaveSummary, HeatmapPayload, Horizon, HorizonStats};

/// Coerces a possibly-missing backend numeric to an explicit absent state.
/// Only finite numbers pass through; null, NaN and infinities are absent.
/// Zero is a valid return and is never treated as missing.
pub fn guard(x: Option<f64>) -> Option<f64> {
    match x {
        Some(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Two-decimal percent for display, `NA` when the value is absent.
pub fn format_pct(x: Option<f64>) -> String {
    match guard(x) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "NA".to_string(),
    }
}

/// Compounds a per-period return sequence into cumulative levels. The
/// running value starts at 1.0 and each emitted entry already reflects that
/// period's return, so `out[0] == 1 + r[0]`. A -1.0 return collapses the
/// level to zero and it stays there.
pub fn cumulate(returns: &[f64]) -> Vec<f64> {
    let mut level = 1.0;
    returns
        .iter()
        .map(|r| {
            level *= 1.0 + r;
            level
        })
        .collect()
}

/// Turns N colors into 2N colorscale break-points forming N equal-width
/// flat bands over [0, 1], so integer codes render as discrete colors on a
/// continuous-domain heatmap. The caller sets zmin/zmax to [0, N-1].
pub fn discrete_colorscale(colors: &[&str]) -> Vec<(f64, String)> {
    let n = colors.len();
    let mut scale = Vec::with_capacity(2 * n);
    for (i, color) in colors.iter().enumerate() {
        scale.push((i as f64 / n as f64, color.to_string()));
        scale.push(((i + 1) as f64 / n as f64, color.to_string()));
    }
    scale
}

/// Assigns integer codes 0..K-1 in authoritative-list order. The assignment
/// is a pure function of the list, so codes stay stable across re-renders
/// as long as the catalog is stable.
pub fn factor_codes(factors: &[String]) -> HashMap<String, i32> {
    factors
        .iter()
        .enumerate()
        .map(|(i, f)| (f.clone(), i as i32))
        .collect()
}

/// Code and annotation grids for the ranked heatmap, `[rank][month]`
/// oriented for the renderer's `z`/`text` inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    pub codes: Vec<Vec<i32>>,
    pub text: Vec<Vec<String>>,
    pub ranks: Vec<u32>,
    pub months: Vec<String>,
}

/// Builds the heatmap code matrix and text annotations. Output dimensions
/// equal input dimensions; months and ranks are never reordered or
/// filtered. Labels outside the authoritative list code as -1 (fallback
/// color), absent returns annotate as `NA`.
pub fn build_grid(payload: &HeatmapPayload) -> HeatmapGrid {
    let months = payload.months.clone();
    let n_ranks = payload.ranked_factors.first().map_or(0, Vec::len);
    let codes_by_label = factor_codes(&payload.factor_list());

    let mut codes = vec![vec![0i32; months.len()]; n_ranks];
    let mut text = vec![vec![String::new(); months.len()]; n_ranks];

    for col in 0..months.len() {
        for row in 0..n_ranks {
            let label = payload
                .ranked_factors
                .get(col)
                .and_then(|ranks| ranks.get(row))
                .map_or("", String::as_str);
            let ret = payload
                .ranked_returns
                .get(col)
                .and_then(|ranks| ranks.get(row))
                .copied()
                .flatten();

            codes[row][col] = codes_by_label.get(label).copied().unwrap_or(-1);
            text[row][col] = format!("{}<br>{}", label, format_pct(ret));
        }
    }

    HeatmapGrid {
        codes,
        text,
        ranks: (1..=n_ranks as u32).collect(),
        months,
    }
}

/// Maps event calendar dates onto a trading-day index: the smallest index
/// whose date is on or after the event date. Exact dates hit the map built
/// once per sequence; non-trading dates fall back to an ordered search.
/// Both agree whenever both apply.
#[derive(Debug)]
pub struct EventAligner<'a> {
    dates: &'a [NaiveDate],
    by_date: HashMap<NaiveDate, usize>,
}

impl<'a> EventAligner<'a> {
    pub fn new(dates: &'a [NaiveDate]) -> Self {
        let by_date = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        Self { dates, by_date }
    }

    /// None iff the date is past the last trading day. Never clamps to the
    /// last index; the caller drops such events.
    pub fn align(&self, date: NaiveDate) -> Option<usize> {
        if let Some(&idx) = self.by_date.get(&date) {
            return Some(idx);
        }
        let idx = self.dates.partition_point(|d| *d < date);
        (idx < self.dates.len()).then_some(idx)
    }
}

/// Per-factor bar values for the Global Wave comparison chart, positionally
/// aligned to the requested factor order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBars {
    pub trough: Vec<Option<f64>>,
    pub peak: Vec<Option<f64>>,
}

/// Extracts the per-horizon average post-event returns for each factor in
/// `order`. A factor with no summary yields an absent entry at its position
/// rather than being omitted, so both outputs have `order.len()` entries.
pub fn select_summaries(
    summaries: &HashMap<String, GlobalWaveSummary>,
    horizon: Horizon,
    order: &[String],
) -> SummaryBars {
    let pick = |stats: &HorizonStats| match horizon {
        Horizon::SixMonths => guard(stats.avg_6m),
        Horizon::TwelveMonths => guard(stats.avg_12m),
    };
    SummaryBars {
        trough: order
            .iter()
            .map(|f| summaries.get(f).and_then(|s| pick(&s.summary.trough)))
            .collect(),
        peak: order
            .iter()
            .map(|f| summaries.get(f).and_then(|s| pick(&s.summary.peak)))
            .collect(),
    }
}
