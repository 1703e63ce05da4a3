// End-to-end transform pipeline: backend-shaped JSON in, renderer-shaped
// JSON out, without touching the network.

use factor_dashboard_api::handlers::heatmap::heatmap_trace;
use factor_dashboard_api::handlers::performance::cumulative_trace;
use factor_dashboard_api::models::{GlobalWaveSummary, HeatmapPayload, MetricRow, ReturnSeries};
use factor_dashboard_api::services::overlay::build_signal_overlay;

use approx::assert_relative_eq;
use serde_json::{json, Value};

const HEATMAP_JSON: &str = r#"{
    "months": ["2025-06", "2025-07"],
    "ranked_factors": [["PE_low", "Top300"], ["Top300", "PE_low"]],
    "ranked_returns": [[0.021, -0.004], [0.013, null]],
    "factors": ["PE_low", "Top300"]
}"#;

const GLOBAL_WAVE_JSON: &str = r#"{
    "factor": "Top300",
    "summary": {
        "trough": {"n_events": 2, "n_6m": 2, "n_12m": 1, "avg_6m": 0.114, "avg_12m": 0.201},
        "peak": {"n_events": 1, "n_6m": 1, "n_12m": 0, "avg_6m": -0.032, "avg_12m": null}
    },
    "events": [
        {"type": "trough", "date": "2020-01-04", "r_6m": 0.114, "r_12m": 0.201},
        {"type": "trough", "date": "2020-01-04", "r_6m": 0.114, "r_12m": 0.201},
        {"type": "peak", "date": "2020-01-03", "r_6m": -0.032, "r_12m": null},
        {"type": "peak", "date": "2021-01-01", "r_6m": null, "r_12m": null}
    ]
}"#;

const RETURNS_JSON: &str = r#"{
    "factor": "Top300",
    "dates": ["2020-01-02", "2020-01-03", "2020-01-06"],
    "ret": [0.01, -0.02, 0.03]
}"#;

#[test]
fn heatmap_payload_becomes_a_discrete_banded_trace() {
    let payload: HeatmapPayload = serde_json::from_str(HEATMAP_JSON).unwrap();
    let trace = heatmap_trace(&payload).unwrap();

    // Codes come from catalog order, laid out [rank][month].
    assert_eq!(trace.z, vec![vec![0, 1], vec![1, 0]]);
    assert_eq!(trace.x, vec!["2025-06", "2025-07"]);
    assert_eq!(trace.y, vec![1, 2]);
    assert_eq!(trace.text[1][1], "PE_low<br>NA");
    assert_eq!(trace.text[0][0], "PE_low<br>2.10%");

    // Two catalog factors: two flat bands, four break-points, domain [0, 1].
    assert_eq!(trace.colorscale.len(), 4);
    assert_eq!(trace.colorscale[0].0, 0.0);
    assert_eq!(trace.colorscale[3].0, 1.0);
    assert_eq!(trace.zmin, 0.0);
    assert_eq!(trace.zmax, 1.0);

    let wire: Value = serde_json::to_value(&trace).unwrap();
    assert_eq!(wire["type"], "heatmap");
    assert_eq!(wire["showscale"], json!(false));
    assert_eq!(wire["z"][0][0], json!(0));
}

#[test]
fn empty_heatmap_payload_yields_no_trace() {
    let payload: HeatmapPayload = serde_json::from_str(
        r#"{"months": [], "ranked_factors": [], "ranked_returns": []}"#,
    )
    .unwrap();
    assert!(heatmap_trace(&payload).is_none());
}

#[test]
fn return_series_becomes_a_cumulative_line_trace() {
    let series: ReturnSeries = serde_json::from_str(RETURNS_JSON).unwrap();
    let series = series.sanitized();
    let trace = cumulative_trace(&series);

    assert_eq!(trace.name, "Top300");
    assert_relative_eq!(trace.y[0], 1.01, epsilon = 1e-12);
    assert_relative_eq!(trace.y[2], 1.01 * 0.98 * 1.03, epsilon = 1e-12);

    let wire: Value = serde_json::to_value(&trace).unwrap();
    assert_eq!(wire["type"], "scatter");
    assert_eq!(wire["mode"], "lines");
    assert_eq!(wire["x"][0], "2020-01-02");
    // Unset styling is omitted, not null.
    assert!(wire.get("line").is_none());
}

#[test]
fn pooled_events_become_markers_and_guides_on_the_benchmark() {
    let benchmark: ReturnSeries = serde_json::from_str(RETURNS_JSON).unwrap();
    let wave: GlobalWaveSummary = serde_json::from_str(GLOBAL_WAVE_JSON).unwrap();
    let events = wave.events.unwrap();

    let overlay = build_signal_overlay(&benchmark, &events);

    // The duplicated trough collapses; the 2021 peak is past the last
    // trading day and is dropped from markers and guides both.
    assert_eq!(overlay.troughs.x.len(), 1);
    assert_eq!(overlay.peaks.x.len(), 1);
    assert_eq!(overlay.shapes.len(), 2);

    // Weekend trough aligns forward to 2020-01-06 while its guide stays on
    // the calendar date.
    let wire: Value = serde_json::to_value(&overlay).unwrap();
    assert_eq!(wire["troughs"]["x"][0], "2020-01-06");
    let trough_guide = wire["shapes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["line"]["color"].as_str().unwrap().contains("34,197,94"))
        .unwrap();
    assert_eq!(trough_guide["x0"], "2020-01-04");
    assert_eq!(trough_guide["yref"], "paper");
    assert_eq!(trough_guide["line"]["dash"], "dot");
}

#[test]
fn metric_rows_round_trip_with_null_sharpe() {
    let row: MetricRow = serde_json::from_str(
        r#"{"factor": "PE_low", "ann_return": 0.12, "ann_vol": 0.0, "sharpe": null, "maxdd": -0.3}"#,
    )
    .unwrap();
    let row = row.guarded();
    assert_eq!(row.sharpe, None);

    let wire: Value = serde_json::to_value(&row).unwrap();
    assert_eq!(wire["sharpe"], Value::Null);
    assert_eq!(wire["maxdd"], json!(-0.3));
}
