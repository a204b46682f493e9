use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SignalError;

/// OHLCV bar enriched with precomputed indicator values.
///
/// Indicator fields are filled in by the data layer before analysis; a field
/// left `None` that an analysis path needs surfaces as
/// [`SignalError::MissingIndicator`] via the accessor methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Short-period moving average (e.g. 5-bar)
    #[serde(default)]
    pub ma_short: Option<f64>,
    /// Medium-period moving average (e.g. 20-bar)
    #[serde(default)]
    pub ma_medium: Option<f64>,
    /// Long-period moving average (e.g. 60-bar)
    #[serde(default)]
    pub ma_long: Option<f64>,
    /// Momentum oscillator line (MACD)
    #[serde(default)]
    pub macd: Option<f64>,
    #[serde(default)]
    pub macd_signal: Option<f64>,
    #[serde(default)]
    pub macd_hist: Option<f64>,
    /// Bounded 0-100 strength oscillator (RSI)
    #[serde(default)]
    pub rsi: Option<f64>,
}

fn require(value: Option<f64>, field: &'static str) -> Result<f64, SignalError> {
    value.ok_or(SignalError::MissingIndicator { field })
}

impl PricePoint {
    /// Bare bar with no indicator fields populated.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            ma_short: None,
            ma_medium: None,
            ma_long: None,
            macd: None,
            macd_signal: None,
            macd_hist: None,
            rsi: None,
        }
    }

    pub fn ma_short(&self) -> Result<f64, SignalError> {
        require(self.ma_short, "ma_short")
    }

    pub fn ma_medium(&self) -> Result<f64, SignalError> {
        require(self.ma_medium, "ma_medium")
    }

    pub fn ma_long(&self) -> Result<f64, SignalError> {
        require(self.ma_long, "ma_long")
    }

    pub fn macd(&self) -> Result<f64, SignalError> {
        require(self.macd, "macd")
    }

    pub fn macd_signal(&self) -> Result<f64, SignalError> {
        require(self.macd_signal, "macd_signal")
    }

    pub fn macd_hist(&self) -> Result<f64, SignalError> {
        require(self.macd_hist, "macd_hist")
    }

    pub fn rsi(&self) -> Result<f64, SignalError> {
        require(self.rsi, "rsi")
    }
}

/// Trade direction. A "hold" is expressed as the absence of a signal
/// (`Option<TradingSignal>`), never as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }
}

/// Signal strength tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalStrength {
    Weak,
    Medium,
    Strong,
}

impl SignalStrength {
    /// Numeric vote weight used by weighted fusion.
    pub fn vote_weight(&self) -> f64 {
        match self {
            SignalStrength::Weak => 1.0,
            SignalStrength::Medium => 2.0,
            SignalStrength::Strong => 3.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalStrength::Weak => "weak",
            SignalStrength::Medium => "medium",
            SignalStrength::Strong => "strong",
        }
    }
}

/// A directional trading signal produced by one strategy source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    pub direction: Direction,
    pub strength: SignalStrength,
    /// Always within [0, 1]
    pub confidence: f64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl TradingSignal {
    /// Build a signal, clamping confidence into [0, 1].
    pub fn new(
        direction: Direction,
        strength: SignalStrength,
        confidence: f64,
        reason: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            direction,
            strength,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
            timestamp,
        }
    }
}

/// Fused signal from multiple sources, retaining the normalized vote scores
/// and per-source reasons for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeSignal {
    pub signal: TradingSignal,
    /// Weight-normalized buy vote score
    pub buy_score: f64,
    /// Weight-normalized sell vote score
    pub sell_score: f64,
    /// One entry per contributing source
    pub reasons: Vec<String>,
}
