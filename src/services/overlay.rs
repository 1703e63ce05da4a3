// src/services/overlay.rs
//
// Composes the Global Wave signal chart: the benchmark's cumulative trace,
// peak/trough markers aligned onto its trading days, and one vertical guide
// per event at the original calendar date.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{
    EventKind, GlobalWaveEvent, LineStyle, LineTrace, MarkerStyle, MarkerTrace, ReturnSeries,
    VerticalGuide,
};
use crate::services::palette::{
    BENCHMARK_COLOR, MARKER_OUTLINE_COLOR, PEAK_COLOR, PEAK_GUIDE_COLOR, TROUGH_COLOR,
    TROUGH_GUIDE_COLOR,
};
use crate::services::transforms::{cumulate, EventAligner};

#[derive(Debug, Serialize)]
pub struct SignalOverlay {
    pub benchmark: LineTrace,
    pub peaks: MarkerTrace,
    pub troughs: MarkerTrace,
    pub shapes: Vec<VerticalGuide>,
}

/// Builds the overlay from the benchmark series and a pooled event list.
/// Events are deduplicated by (date, kind) in first-seen order; events past
/// the end of the benchmark's trading days are excluded from markers and
/// guides alike.
pub fn build_signal_overlay(
    benchmark: &ReturnSeries,
    events: &[GlobalWaveEvent],
) -> SignalOverlay {
    let levels = cumulate(&benchmark.ret);
    let aligner = EventAligner::new(&benchmark.dates);

    let mut seen = HashSet::new();
    let (mut peak_x, mut peak_y) = (Vec::new(), Vec::new());
    let (mut trough_x, mut trough_y) = (Vec::new(), Vec::new());
    let mut shapes = Vec::new();

    for event in events {
        if !seen.insert((event.date, event.kind)) {
            continue;
        }
        let Some(idx) = aligner.align(event.date) else {
            continue;
        };
        match event.kind {
            EventKind::Peak => {
                peak_x.push(benchmark.dates[idx]);
                peak_y.push(levels[idx]);
            }
            EventKind::Trough => {
                trough_x.push(benchmark.dates[idx]);
                trough_y.push(levels[idx]);
            }
        }
        shapes.push(vertical_guide(event));
    }

    SignalOverlay {
        benchmark: LineTrace {
            trace_type: "scatter",
            mode: "lines",
            name: format!("Benchmark ({})", benchmark.factor),
            x: benchmark.dates.clone(),
            y: levels,
            line: Some(LineStyle {
                width: 2.0,
                color: BENCHMARK_COLOR.to_string(),
                dash: None,
            }),
            hovertemplate: Some("%{x}<br>Cum: %{y:.2f}<extra></extra>".to_string()),
        },
        peaks: marker_trace(
            "GW Peak",
            "triangle-down",
            PEAK_COLOR,
            peak_x,
            peak_y,
            "Peak<br>%{x}<extra></extra>",
        ),
        troughs: marker_trace(
            "GW Trough",
            "triangle-up",
            TROUGH_COLOR,
            trough_x,
            trough_y,
            "Trough<br>%{x}<extra></extra>",
        ),
        shapes,
    }
}

fn marker_trace(
    name: &str,
    symbol: &'static str,
    color: &str,
    x: Vec<chrono::NaiveDate>,
    y: Vec<f64>,
    hovertemplate: &str,
) -> MarkerTrace {
    MarkerTrace {
        trace_type: "scatter",
        mode: "markers",
        name: name.to_string(),
        x,
        y,
        marker: MarkerStyle {
            symbol,
            size: 12,
            color: color.to_string(),
            line: Some(LineStyle {
                width: 1.0,
                color: MARKER_OUTLINE_COLOR.to_string(),
                dash: None,
            }),
        },
        hovertemplate: Some(hovertemplate.to_string()),
    }
}

fn vertical_guide(event: &GlobalWaveEvent) -> VerticalGuide {
    let color = match event.kind {
        EventKind::Peak => PEAK_GUIDE_COLOR,
        EventKind::Trough => TROUGH_GUIDE_COLOR,
    };
    VerticalGuide {
        shape_type: "line",
        xref: "x",
        yref: "paper",
        x0: event.date,
        x1: event.date,
        y0: 0.0,
        y1: 1.0,
        line: LineStyle {
            width: 1.0,
            color: color.to_string(),
            dash: Some("dot".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn benchmark() -> ReturnSeries {
        ReturnSeries {
            factor: "Top300".to_string(),
            dates: vec![
                date("2020-01-02"),
                date("2020-01-03"),
                date("2020-01-06"),
                date("2020-01-07"),
            ],
            ret: vec![0.01, -0.02, 0.03, 0.0],
        }
    }

    fn event(kind: EventKind, date_str: &str) -> GlobalWaveEvent {
        GlobalWaveEvent {
            kind,
            date: date(date_str),
            r_6m: None,
            r_12m: None,
        }
    }

    #[test]
    fn markers_read_the_cumulative_level_at_the_aligned_index() {
        // 01-04 is a Saturday; the trough lands on 01-06.
        let overlay = build_signal_overlay(&benchmark(), &[event(EventKind::Trough, "2020-01-04")]);
        assert_eq!(overlay.troughs.x, vec![date("2020-01-06")]);
        assert_relative_eq!(
            overlay.troughs.y[0],
            1.01 * 0.98 * 1.03,
            epsilon = 1e-12
        );
        assert!(overlay.peaks.x.is_empty());
    }

    #[test]
    fn guides_anchor_at_the_original_calendar_date() {
        let overlay = build_signal_overlay(&benchmark(), &[event(EventKind::Peak, "2020-01-05")]);
        assert_eq!(overlay.shapes.len(), 1);
        assert_eq!(overlay.shapes[0].x0, date("2020-01-05"));
        assert_eq!(overlay.shapes[0].x1, date("2020-01-05"));
        // The marker itself sits on the aligned trading day.
        assert_eq!(overlay.peaks.x, vec![date("2020-01-06")]);
    }

    #[test]
    fn duplicate_events_collapse_to_one_marker_and_one_guide() {
        let events = vec![
            event(EventKind::Peak, "2020-01-03"),
            event(EventKind::Peak, "2020-01-03"),
            event(EventKind::Trough, "2020-01-03"),
        ];
        let overlay = build_signal_overlay(&benchmark(), &events);
        assert_eq!(overlay.peaks.x.len(), 1);
        assert_eq!(overlay.troughs.x.len(), 1);
        assert_eq!(overlay.shapes.len(), 2);
    }

    #[test]
    fn events_past_the_last_trading_day_are_dropped_entirely() {
        let overlay = build_signal_overlay(&benchmark(), &[event(EventKind::Trough, "2020-02-01")]);
        assert!(overlay.troughs.x.is_empty());
        assert!(overlay.shapes.is_empty());
    }

    #[test]
    fn benchmark_trace_carries_the_full_series() {
        let overlay = build_signal_overlay(&benchmark(), &[]);
        assert_eq!(overlay.benchmark.name, "Benchmark (Top300)");
        assert_eq!(overlay.benchmark.x.len(), 4);
        assert_eq!(overlay.benchmark.y.len(), 4);
        assert_relative_eq!(overlay.benchmark.y[0], 1.01, epsilon = 1e-12);
    }

    #[test]
    fn empty_benchmark_yields_an_empty_but_well_formed_overlay() {
        let overlay =
            build_signal_overlay(&ReturnSeries::empty("Top300"), &[event(EventKind::Peak, "2020-01-03")]);
        assert!(overlay.benchmark.x.is_empty());
        assert!(overlay.peaks.x.is_empty());
        assert!(overlay.shapes.is_empty());
    }
}
