// src/services/palette.rs
//
// Process-wide color configuration. Initialized once at compile time and
// never written to afterward; every chart reads from here so a factor keeps
// its color across sections and re-renders.

/// Fixed label-to-color table for known factors.
static FACTOR_COLORS: &[(&str, &str)] = &[
    ("High_yield", "#ff7f0e"),
    ("PB_low", "#c49c94"),
    ("PE_low", "#7f7f7f"),
    ("Momentum_01", "#bcbd22"),
    ("Momentum_03", "#8c564b"),
    ("Momentum_06", "#f1c40f"),
    ("High_yoy", "#4e79a7"),
    ("Margin_growth", "#2ca02c"),
    ("EPS_growth", "#76b7b2"),
    ("Low_beta", "#e377c2"),
    ("Top300", "#9c755f"),
];

/// Neutral grey for labels outside the table.
pub const FALLBACK_COLOR: &str = "#d1d5db";

pub const BENCHMARK_COLOR: &str = "#2563eb";
pub const TROUGH_COLOR: &str = "#22c55e";
pub const PEAK_COLOR: &str = "#ef4444";
pub const TROUGH_GUIDE_COLOR: &str = "rgba(34,197,94,0.25)";
pub const PEAK_GUIDE_COLOR: &str = "rgba(239,68,68,0.25)";
pub const MARKER_OUTLINE_COLOR: &str = "#111827";

pub fn color_for(label: &str) -> &'static str {
    FACTOR_COLORS
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(FALLBACK_COLOR, |(_, color)| *color)
}

/// Colors for an authoritative factor list, in list order, ready to feed
/// the discrete colorscale.
pub fn palette_for(factors: &[String]) -> Vec<&'static str> {
    factors.iter().map(|f| color_for(f)).collect()
}
