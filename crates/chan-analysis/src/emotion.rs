use serde::{Deserialize, Serialize};
use signal_core::{PricePoint, SignalError};

/// Oscillator levels that mark crowd-emotion extremes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionThresholds {
    pub overbought: f64,
    pub oversold: f64,
    pub extreme_high: f64,
    pub extreme_low: f64,
}

impl Default for EmotionThresholds {
    fn default() -> Self {
        Self {
            overbought: 80.0,
            oversold: 20.0,
            extreme_high: 90.0,
            extreme_low: 10.0,
        }
    }
}

/// Snapshot of the latest oscillator reading against the thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmotionState {
    pub overbought: bool,
    pub oversold: bool,
    pub extreme: bool,
    pub value: f64,
}

/// Threshold check on the latest bar's strength oscillator. An empty series
/// yields `None`; a populated series without the oscillator is a
/// precondition violation.
pub fn monitor_emotion(
    series: &[PricePoint],
    thresholds: &EmotionThresholds,
) -> Result<Option<EmotionState>, SignalError> {
    let Some(latest) = series.last() else {
        return Ok(None);
    };
    let value = latest.rsi()?;

    Ok(Some(EmotionState {
        overbought: value > thresholds.overbought,
        oversold: value < thresholds.oversold,
        extreme: value > thresholds.extreme_high || value < thresholds.extreme_low,
        value,
    }))
}
