use serde::{Deserialize, Serialize};
use signal_core::PricePoint;

/// Default trailing window for the relative-position range.
pub const DEFAULT_POSITION_LOOKBACK: usize = 120;

/// Where the latest close sits within the trailing high/low range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelativePosition {
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
}

/// Relative position of the latest close inside the trailing window,
/// as a fraction in [0, 1]. A perfectly flat window maps to 0.5. Returns
/// `None` when fewer than `lookback` bars are available.
pub fn position_pct(series: &[PricePoint], lookback: usize) -> Option<f64> {
    if lookback == 0 || series.len() < lookback {
        return None;
    }

    let window = &series[series.len() - lookback..];
    let close = series[series.len() - 1].close;
    let high = window.iter().map(|p| p.high).fold(f64::MIN, f64::max);
    let low = window.iter().map(|p| p.low).fold(f64::MAX, f64::min);

    if high == low {
        Some(0.5)
    } else {
        Some((close - low) / (high - low))
    }
}

/// Bucket a position fraction into its class (inclusive lower bounds,
/// descending: 0.8, 0.6, 0.4, 0.2).
pub fn bucket_position(pct: f64) -> RelativePosition {
    if pct >= 0.8 {
        RelativePosition::High
    } else if pct >= 0.6 {
        RelativePosition::MediumHigh
    } else if pct >= 0.4 {
        RelativePosition::Medium
    } else if pct >= 0.2 {
        RelativePosition::MediumLow
    } else {
        RelativePosition::Low
    }
}

/// Classify the latest close's position in the trailing window; `None` means
/// insufficient history.
pub fn locate_position(series: &[PricePoint], lookback: usize) -> Option<RelativePosition> {
    position_pct(series, lookback).map(bucket_position)
}
