use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signal_core::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalKind {
    Top,
    Bottom,
}

/// A local price extreme over a two-bar window on each side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fractal {
    /// Index into the source series
    pub index: usize,
    pub kind: FractalKind,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Find turning points in the series.
///
/// A top fractal requires the bar's high to be strictly greater than the
/// highs of the two bars on each side; bottoms mirror on lows. A single index
/// can emit both a top and a bottom when both conditions hold. Series shorter
/// than 5 bars produce no fractals.
pub fn detect_fractals(series: &[PricePoint]) -> Vec<Fractal> {
    if series.len() < 5 {
        return Vec::new();
    }

    let mut fractals = Vec::new();
    for i in 2..series.len() - 2 {
        let high = series[i].high;
        let low = series[i].low;

        if high > series[i - 2].high
            && high > series[i - 1].high
            && high > series[i + 1].high
            && high > series[i + 2].high
        {
            fractals.push(Fractal {
                index: i,
                kind: FractalKind::Top,
                price: high,
                timestamp: series[i].timestamp,
            });
        }

        if low < series[i - 2].low
            && low < series[i - 1].low
            && low < series[i + 1].low
            && low < series[i + 2].low
        {
            fractals.push(Fractal {
                index: i,
                kind: FractalKind::Bottom,
                price: low,
                timestamp: series[i].timestamp,
            });
        }
    }

    fractals
}
