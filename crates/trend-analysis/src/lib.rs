use signal_core::{Direction, PricePoint, SignalError, SignalSource, SignalStrength, TradingSignal};

/// Trend-following source built on moving-average alignment with momentum
/// confirmation.
///
/// Three scores are summed: the moving-average stack on the latest bar
/// (fully bullish +1.0, fully bearish -1.0, otherwise +/-0.3 per adjacent
/// pair), the oscillator cross (fresh cross +/-1.0, persistent side +/-0.5),
/// and the histogram slope (+/-0.5). The total spans [-2.5, 2.5]; a signal
/// needs at least +/-1.5.
pub struct TrendStrategy {
    /// Absolute total score required to emit a signal
    pub signal_threshold: f64,
    /// Absolute total score promoted to a strong signal
    pub strong_threshold: f64,
}

const MAX_SCORE: f64 = 2.5;

impl Default for TrendStrategy {
    fn default() -> Self {
        Self {
            signal_threshold: 1.5,
            strong_threshold: 2.0,
        }
    }
}

impl TrendStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moving-average stack score on the latest bar.
    fn ma_alignment_score(&self, latest: &PricePoint) -> Result<f64, SignalError> {
        let short = latest.ma_short()?;
        let medium = latest.ma_medium()?;
        let long = latest.ma_long()?;

        if short > medium && medium > long {
            return Ok(1.0);
        }
        if short < medium && medium < long {
            return Ok(-1.0);
        }

        let mut score = 0.0;
        for (fast, slow) in [(short, medium), (medium, long)] {
            score += if fast > slow { 0.3 } else { -0.3 };
        }
        Ok(score)
    }

    /// Oscillator cross score from the last two bars.
    fn cross_score(&self, series: &[PricePoint]) -> Result<f64, SignalError> {
        if series.len() < 2 {
            return Ok(0.0);
        }
        let previous = &series[series.len() - 2];
        let current = &series[series.len() - 1];

        let macd = current.macd()?;
        let signal = current.macd_signal()?;
        let prev_macd = previous.macd()?;
        let prev_signal = previous.macd_signal()?;

        let score = if macd > signal && prev_macd <= prev_signal {
            1.0
        } else if macd < signal && prev_macd >= prev_signal {
            -1.0
        } else if macd > signal && macd > 0.0 {
            0.5
        } else if macd < signal && macd < 0.0 {
            -0.5
        } else {
            0.0
        };
        Ok(score)
    }

    /// Histogram slope score: expanding momentum in either direction.
    fn histogram_score(&self, series: &[PricePoint]) -> Result<f64, SignalError> {
        if series.len() < 2 {
            return Ok(0.0);
        }
        let prev_hist = series[series.len() - 2].macd_hist()?;
        let hist = series[series.len() - 1].macd_hist()?;

        let score = if hist > 0.0 && hist > prev_hist {
            0.5
        } else if hist < 0.0 && hist < prev_hist {
            -0.5
        } else {
            0.0
        };
        Ok(score)
    }
}

impl SignalSource for TrendStrategy {
    fn name(&self) -> &str {
        "trend_following"
    }

    fn required_indicators(&self) -> &'static [&'static str] {
        &[
            "ma_short",
            "ma_medium",
            "ma_long",
            "macd",
            "macd_signal",
            "macd_hist",
        ]
    }

    fn evaluate(&self, series: &[PricePoint]) -> Result<Option<TradingSignal>, SignalError> {
        let Some(latest) = series.last() else {
            return Ok(None);
        };
        if series.len() < 2 {
            return Ok(None);
        }

        let ma_score = self.ma_alignment_score(latest)?;
        let cross = self.cross_score(series)?;
        let momentum = self.histogram_score(series)?;
        let total = ma_score + cross + momentum;

        tracing::debug!(ma_score, cross, momentum, total, "trend scores");

        let direction = if total >= self.signal_threshold {
            Direction::Buy
        } else if total <= -self.signal_threshold {
            Direction::Sell
        } else {
            return Ok(None);
        };

        let strength = if total.abs() >= self.strong_threshold {
            SignalStrength::Strong
        } else {
            SignalStrength::Medium
        };
        let confidence = (total.abs() / MAX_SCORE).min(1.0);
        let side = match direction {
            Direction::Buy => "bullish",
            Direction::Sell => "bearish",
        };

        Ok(Some(TradingSignal::new(
            direction,
            strength,
            confidence,
            format!(
                "{side} trend: ma alignment {ma_score:.1}, cross {cross:.1}, momentum {momentum:.1}"
            ),
            latest.timestamp,
        )))
    }
}
