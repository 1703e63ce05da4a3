// src/handlers/heatmap.rs
use log::info;
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::{HeatmapPayload, HeatmapTrace};
use crate::services::analytics::AnalyticsClient;
use crate::services::palette::palette_for;
use crate::services::transforms::{build_grid, discrete_colorscale};

#[derive(Serialize)]
struct HeatmapResponse {
    trace: Option<HeatmapTrace>,
}

/// Chart-ready heatmap trace for a ranked payload: the code grid as `z`
/// over a discrete colorscale with one band per catalog factor. None when
/// the payload carries no factors (nothing to band the colorscale over).
pub fn heatmap_trace(payload: &HeatmapPayload) -> Option<HeatmapTrace> {
    let factors = payload.factor_list();
    if factors.is_empty() {
        return None;
    }
    let grid = build_grid(payload);
    let colors = palette_for(&factors);
    Some(HeatmapTrace {
        trace_type: "heatmap",
        z: grid.codes,
        x: grid.months,
        y: grid.ranks,
        text: grid.text,
        colorscale: discrete_colorscale(&colors),
        zmin: 0.0,
        zmax: (factors.len() - 1) as f64,
        showscale: false,
        hovertemplate: "Month: %{x}<br>Rank: %{y}<br>%{text}<extra></extra>".to_string(),
    })
}

pub async fn get_heatmap(client: Arc<AnalyticsClient>) -> Result<Json, Rejection> {
    info!("Handling request for the ranked heatmap");
    let payload = client.heatmap_12m().await;
    let trace = payload.as_ref().and_then(heatmap_trace);
    Ok(warp::reply::json(&HeatmapResponse { trace }))
}
