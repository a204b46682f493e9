use signal_core::{Direction, PricePoint, SignalError, SignalSource, SignalStrength, TradingSignal};

/// Relative-strength source blending the strength oscillator with price
/// momentum and volume confirmation.
///
/// Component scores each live in [-1, 1] and are blended with fixed weights
/// (oscillator 0.5, rate of change 0.3, volume 0.2). Totals beyond +/-0.6
/// emit a signal; beyond +/-0.8 a strong one.
pub struct StrengthStrategy {
    /// Bars used for the rate-of-change calculation
    pub momentum_period: usize,
    /// Bars used for the trailing mean volume
    pub volume_period: usize,
    pub signal_threshold: f64,
    pub strong_threshold: f64,
}

const OSCILLATOR_WEIGHT: f64 = 0.5;
const MOMENTUM_WEIGHT: f64 = 0.3;
const VOLUME_WEIGHT: f64 = 0.2;

impl Default for StrengthStrategy {
    fn default() -> Self {
        Self {
            momentum_period: 10,
            volume_period: 20,
            signal_threshold: 0.6,
            strong_threshold: 0.8,
        }
    }
}

impl StrengthStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Band score for the 0-100 oscillator: deep extremes score contrarian.
    fn oscillator_score(&self, value: f64) -> f64 {
        if value > 80.0 {
            -1.0
        } else if value > 70.0 {
            -0.5
        } else if value < 20.0 {
            1.0
        } else if value < 30.0 {
            0.5
        } else if value > 50.0 {
            0.2
        } else {
            -0.2
        }
    }

    /// Rate-of-change score over the momentum window, in percent.
    fn momentum_score(&self, series: &[PricePoint]) -> f64 {
        let n = series.len();
        let base = series[n - 1 - self.momentum_period].close;
        if base == 0.0 {
            return 0.0;
        }
        let roc = (series[n - 1].close - base) / base * 100.0;

        if roc > 10.0 {
            1.0
        } else if roc > 5.0 {
            0.5
        } else if roc < -10.0 {
            -1.0
        } else if roc < -5.0 {
            -0.5
        } else {
            roc / 10.0
        }
    }

    /// Volume-expansion score against the trailing mean.
    fn volume_score(&self, series: &[PricePoint]) -> f64 {
        let window = &series[series.len().saturating_sub(self.volume_period)..];
        let mean: f64 = window.iter().map(|p| p.volume).sum::<f64>() / window.len() as f64;
        if mean == 0.0 {
            return 0.0;
        }

        let ratio = series[series.len() - 1].volume / mean;
        if ratio > 2.0 {
            0.8
        } else if ratio > 1.5 {
            0.5
        } else if ratio < 0.5 {
            -0.3
        } else {
            0.2
        }
    }
}

impl SignalSource for StrengthStrategy {
    fn name(&self) -> &str {
        "relative_strength"
    }

    fn required_indicators(&self) -> &'static [&'static str] {
        &["rsi"]
    }

    fn evaluate(&self, series: &[PricePoint]) -> Result<Option<TradingSignal>, SignalError> {
        if series.len() <= self.momentum_period {
            return Ok(None);
        }
        let latest = &series[series.len() - 1];
        let oscillator = latest.rsi()?;

        let osc_score = self.oscillator_score(oscillator);
        let roc_score = self.momentum_score(series);
        let vol_score = self.volume_score(series);

        let total = OSCILLATOR_WEIGHT * osc_score
            + MOMENTUM_WEIGHT * roc_score
            + VOLUME_WEIGHT * vol_score;

        tracing::debug!(osc_score, roc_score, vol_score, total, "strength scores");

        let direction = if total > self.signal_threshold {
            Direction::Buy
        } else if total < -self.signal_threshold {
            Direction::Sell
        } else {
            return Ok(None);
        };

        let strength = if total.abs() > self.strong_threshold {
            SignalStrength::Strong
        } else {
            SignalStrength::Medium
        };
        let side = match direction {
            Direction::Buy => "strength building",
            Direction::Sell => "strength fading",
        };

        Ok(Some(TradingSignal::new(
            direction,
            strength,
            total.abs().min(1.0),
            format!(
                "{side}: oscillator {osc_score:.2}, momentum {roc_score:.2}, volume {vol_score:.2}"
            ),
            latest.timestamp,
        )))
    }
}
