use serde::{Deserialize, Serialize};
use serde_json::json;
use signal_core::{PricePoint, SignalError, SignalSource, TradingSignal};

use crate::composer::{compose_signal, position_size};
use crate::divergence::{detect_divergence, Divergence};
use crate::emotion::{monitor_emotion, EmotionState, EmotionThresholds};
use crate::fractal::{detect_fractals, Fractal};
use crate::points::classify_points;
use crate::position::{locate_position, RelativePosition, DEFAULT_POSITION_LOOKBACK};
use crate::stroke::{build_strokes, Stroke, DEFAULT_MIN_STROKE_BARS};
use crate::trend::{classify_trend, TrendLabel};

/// Bars of history required before a status snapshot is meaningful.
const MIN_STATUS_BARS: usize = 50;

/// Tunable parameters of the Chan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChanConfig {
    /// Minimum bar gap between a stroke's two fractals
    pub min_stroke_bars: usize,
    /// Trailing window for the relative-position range; also the minimum
    /// series length before a signal is attempted
    pub position_lookback: usize,
    pub emotion: EmotionThresholds,
    /// Base position fraction before multipliers
    pub base_position: f64,
    /// Hard cap on the suggested position fraction
    pub max_position: f64,
}

impl Default for ChanConfig {
    fn default() -> Self {
        Self {
            min_stroke_bars: DEFAULT_MIN_STROKE_BARS,
            position_lookback: DEFAULT_POSITION_LOOKBACK,
            emotion: EmotionThresholds::default(),
            base_position: 0.2,
            max_position: 0.5,
        }
    }
}

impl ChanConfig {
    /// Validate parameter ranges, consuming and returning the config.
    pub fn validated(self) -> Result<Self, SignalError> {
        if self.min_stroke_bars == 0 {
            return Err(SignalError::InvalidParameter(
                "min_stroke_bars must be at least 1".to_string(),
            ));
        }
        if self.position_lookback < 2 {
            return Err(SignalError::InvalidParameter(
                "position_lookback must be at least 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.base_position)
            || !(0.0..=1.0).contains(&self.max_position)
            || self.base_position > self.max_position
        {
            return Err(SignalError::InvalidParameter(
                "position fractions must satisfy 0 <= base <= max <= 1".to_string(),
            ));
        }
        let em = &self.emotion;
        let ordered = em.extreme_low <= em.oversold
            && em.oversold < em.overbought
            && em.overbought <= em.extreme_high;
        if !ordered || em.extreme_low < 0.0 || em.extreme_high > 100.0 {
            return Err(SignalError::InvalidParameter(
                "emotion thresholds must be ordered within [0, 100]".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Current classification state of the pipeline, for monitoring/reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyStatus {
    pub trend: TrendLabel,
    pub position: Option<RelativePosition>,
    pub stroke_count: usize,
    pub divergence: Option<Divergence>,
    pub emotion: Option<EmotionState>,
    pub last_fractal: Option<Fractal>,
    pub last_stroke: Option<Stroke>,
}

impl StrategyStatus {
    /// Flat JSON rendering for dashboards and logs.
    pub fn metrics(&self) -> serde_json::Value {
        json!({
            "trend": format!("{:?}", self.trend),
            "position": self.position.map(|p| format!("{p:?}")),
            "stroke_count": self.stroke_count,
            "divergence": self.divergence.map(|d| format!("{d:?}")),
            "oscillator": self.emotion.map(|e| e.value),
            "emotion_extreme": self.emotion.map(|e| e.extreme),
            "last_fractal_index": self.last_fractal.as_ref().map(|f| f.index),
            "last_stroke_span": self.last_stroke.as_ref().map(|s| s.bar_span()),
        })
    }
}

/// Chan-theory daily-stroke strategy: fractals -> strokes -> trend /
/// position / entry points / divergence / emotion -> one composed signal.
pub struct ChanStrategy {
    config: ChanConfig,
}

impl ChanStrategy {
    pub fn new() -> Self {
        Self {
            config: ChanConfig::default(),
        }
    }

    pub fn with_config(config: ChanConfig) -> Result<Self, SignalError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &ChanConfig {
        &self.config
    }

    /// Run the full pipeline over the series.
    ///
    /// Series shorter than the position lookback, or series that form no
    /// stroke, yield no signal. Missing required indicators propagate as
    /// errors.
    pub fn analyze(&self, series: &[PricePoint]) -> Result<Option<TradingSignal>, SignalError> {
        if series.len() < self.config.position_lookback {
            return Ok(None);
        }

        let fractals = detect_fractals(series);
        let strokes = build_strokes(&fractals, self.config.min_stroke_bars);
        if strokes.is_empty() {
            return Ok(None);
        }

        let trend = classify_trend(series, &strokes)?;
        let position = locate_position(series, self.config.position_lookback);
        let points = classify_points(&strokes, trend);
        let divergence = detect_divergence(series, &strokes)?;
        let emotion = monitor_emotion(series, &self.config.emotion)?;

        tracing::debug!(
            ?trend,
            ?position,
            strokes = strokes.len(),
            points = points.len(),
            ?divergence,
            "chan pipeline classified"
        );

        let timestamp = series[series.len() - 1].timestamp;
        Ok(compose_signal(
            trend, position, &points, divergence, emotion, timestamp,
        ))
    }

    /// Suggested position fraction for a signal produced from this series.
    pub fn position_size(&self, signal: &TradingSignal, series: &[PricePoint]) -> f64 {
        let position = locate_position(series, self.config.position_lookback);
        position_size(
            signal,
            position,
            self.config.base_position,
            self.config.max_position,
        )
    }

    /// Snapshot the pipeline's classification state. `None` when fewer than
    /// 50 bars are available.
    pub fn status(&self, series: &[PricePoint]) -> Result<Option<StrategyStatus>, SignalError> {
        if series.len() < MIN_STATUS_BARS {
            return Ok(None);
        }

        let fractals = detect_fractals(series);
        let strokes = build_strokes(&fractals, self.config.min_stroke_bars);
        let trend = classify_trend(series, &strokes)?;
        let position = locate_position(series, self.config.position_lookback);
        let divergence = detect_divergence(series, &strokes)?;
        let emotion = monitor_emotion(series, &self.config.emotion)?;

        Ok(Some(StrategyStatus {
            trend,
            position,
            stroke_count: strokes.len(),
            divergence,
            emotion,
            last_fractal: fractals.last().cloned(),
            last_stroke: strokes.last().cloned(),
        }))
    }
}

impl Default for ChanStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for ChanStrategy {
    fn name(&self) -> &str {
        "chan_daily_stroke"
    }

    fn required_indicators(&self) -> &'static [&'static str] {
        &[
            "ma_short",
            "ma_medium",
            "ma_long",
            "macd",
            "macd_signal",
            "macd_hist",
            "rsi",
        ]
    }

    fn evaluate(&self, series: &[PricePoint]) -> Result<Option<TradingSignal>, SignalError> {
        self.analyze(series)
    }
}
