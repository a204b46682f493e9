use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use signal_core::{
    CompositeSignal, Direction, PricePoint, SignalError, SignalSource, SignalStrength,
    TradingSignal,
};

/// Bounds every source weight is clamped to.
pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 2.0;

/// Normalized vote score a direction must exceed to win.
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.6;

/// Fusion bookkeeping for one registered source. Weight, enabled flag and
/// counters belong to the tree, not to the source implementation.
struct SourceEntry {
    source: Box<dyn SignalSource>,
    weight: f64,
    enabled: bool,
    trades: u32,
    wins: u32,
    total_profit: f64,
}

impl SourceEntry {
    fn win_rate(&self) -> f64 {
        if self.trades == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.trades)
        }
    }
}

/// Per-source performance snapshot for monitoring/reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SourcePerformance {
    pub name: String,
    pub weight: f64,
    pub enabled: bool,
    pub trade_count: u32,
    pub total_profit: f64,
    pub win_rate: f64,
}

/// Audit record of one emitted composite signal.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeRecord {
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub strength: SignalStrength,
    pub confidence: f64,
    pub buy_score: f64,
    pub sell_score: f64,
}

/// Multi-strategy decision tree: fuses the signals of registered sources by
/// confidence- and strength-weighted voting, and adapts source weights from
/// realized win rates.
///
/// Fusion (`composite_signal*`) borrows the tree immutably and is safe to run
/// concurrently; every mutation (registration, performance recording, weight
/// adaptation) takes `&mut self`, so the single-writer discipline on weights
/// is enforced by the borrow checker. Sharing one tree across threads with
/// mutation is the caller's lock to take.
pub struct StrategyTree {
    entries: Vec<SourceEntry>,
    risk_threshold: f64,
    history: Vec<CompositeRecord>,
}

impl StrategyTree {
    pub fn new() -> Self {
        Self::with_risk_threshold(DEFAULT_RISK_THRESHOLD)
    }

    pub fn with_risk_threshold(risk_threshold: f64) -> Self {
        Self {
            entries: Vec::new(),
            risk_threshold,
            history: Vec::new(),
        }
    }

    /// Register a source at the default weight of 1.0. A source with the
    /// same name replaces the previous registration, counters included.
    pub fn add(&mut self, source: Box<dyn SignalSource>) {
        self.add_weighted(source, 1.0);
    }

    /// Register a source with an initial weight, clamped to [0.1, 2.0].
    pub fn add_weighted(&mut self, source: Box<dyn SignalSource>, weight: f64) {
        let weight = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
        self.entries.retain(|e| e.source.name() != source.name());
        tracing::info!(name = source.name(), weight, "registering strategy source");
        self.entries.push(SourceEntry {
            source,
            weight,
            enabled: true,
            trades: 0,
            wins: 0,
            total_profit: 0.0,
        });
    }

    /// Deregister a source. Returns false when the name is unknown.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.source.name() != name);
        before != self.entries.len()
    }

    pub fn enable(&mut self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    pub fn disable(&mut self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.source.name() == name) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record one closed trade attributed to a source. Profits above zero
    /// count as wins. Returns false when the name is unknown.
    pub fn record_trade(&mut self, name: &str, profit: f64) -> bool {
        match self.entries.iter_mut().find(|e| e.source.name() == name) {
            Some(entry) => {
                entry.trades += 1;
                if profit > 0.0 {
                    entry.wins += 1;
                }
                entry.total_profit += profit;
                true
            }
            None => false,
        }
    }

    /// Performance snapshot of every registered source.
    pub fn list(&self) -> Vec<SourcePerformance> {
        self.entries
            .iter()
            .map(|e| SourcePerformance {
                name: e.source.name().to_string(),
                weight: e.weight,
                enabled: e.enabled,
                trade_count: e.trades,
                total_profit: e.total_profit,
                win_rate: e.win_rate(),
            })
            .collect()
    }

    /// Emitted composite signals, oldest first.
    pub fn history(&self) -> &[CompositeRecord] {
        &self.history
    }

    /// Fuse the enabled sources' signals for this series.
    pub fn composite_signal(
        &self,
        series: &[PricePoint],
    ) -> Result<Option<CompositeSignal>, SignalError> {
        self.composite_signal_with_hint(series, None)
    }

    /// Fuse with an optional external confidence hint in [0, 1], e.g. an
    /// AI-derived score already resolved by the caller (pass the caller's
    /// fallback such as 0.5 rather than waiting on anything here). The hint
    /// joins the confidence normalization as one more unit-weight
    /// contributor; it never votes on direction.
    pub fn composite_signal_with_hint(
        &self,
        series: &[PricePoint],
        ai_confidence: Option<f64>,
    ) -> Result<Option<CompositeSignal>, SignalError> {
        let enabled: Vec<&SourceEntry> = self.entries.iter().filter(|e| e.enabled).collect();
        if enabled.is_empty() {
            return Ok(None);
        }

        // Sources are pure over an immutable snapshot; sweep them in parallel.
        let evaluated: Vec<Option<(String, f64, TradingSignal)>> = enabled
            .par_iter()
            .map(|entry| {
                entry.source.evaluate(series).map(|signal| {
                    signal.map(|s| (entry.source.name().to_string(), entry.weight, s))
                })
            })
            .collect::<Result<Vec<_>, SignalError>>()?;
        let contributors: Vec<(String, f64, TradingSignal)> =
            evaluated.into_iter().flatten().collect();

        if contributors.is_empty() {
            return Ok(None);
        }

        let mut buy_score = 0.0;
        let mut sell_score = 0.0;
        let mut confidence_sum = 0.0;
        let mut total_weight = 0.0;
        let mut reasons = Vec::with_capacity(contributors.len());

        for (name, weight, signal) in &contributors {
            let weighted_confidence = signal.confidence * weight;
            match signal.direction {
                Direction::Buy => buy_score += weighted_confidence * signal.strength.vote_weight(),
                Direction::Sell => {
                    sell_score += weighted_confidence * signal.strength.vote_weight()
                }
            }
            confidence_sum += weighted_confidence;
            total_weight += weight;
            reasons.push(format!("{name}: {} (weight {weight:.2})", signal.reason));
        }

        buy_score /= total_weight;
        sell_score /= total_weight;
        let confidence = match ai_confidence {
            Some(hint) => (confidence_sum + hint.clamp(0.0, 1.0)) / (total_weight + 1.0),
            None => confidence_sum / total_weight,
        }
        .clamp(0.0, 1.0);

        let (direction, winning_score) = if buy_score > sell_score && buy_score > self.risk_threshold
        {
            (Direction::Buy, buy_score)
        } else if sell_score > buy_score && sell_score > self.risk_threshold {
            (Direction::Sell, sell_score)
        } else {
            tracing::debug!(
                buy_score,
                sell_score,
                threshold = self.risk_threshold,
                "no side cleared the risk threshold"
            );
            return Ok(None);
        };

        let strength = if winning_score >= 0.8 {
            SignalStrength::Strong
        } else if winning_score >= 0.7 {
            SignalStrength::Medium
        } else {
            SignalStrength::Weak
        };

        tracing::info!(
            direction = direction.label(),
            strength = strength.label(),
            confidence,
            buy_score,
            sell_score,
            contributors = contributors.len(),
            "composite signal"
        );

        Ok(Some(CompositeSignal {
            signal: TradingSignal::new(
                direction,
                strength,
                confidence,
                format!("composite of {} sources", contributors.len()),
                Utc::now(),
            ),
            buy_score,
            sell_score,
            reasons,
        }))
    }

    /// Fuse and append any emitted signal to the audit history.
    pub fn composite_signal_recorded(
        &mut self,
        series: &[PricePoint],
        ai_confidence: Option<f64>,
    ) -> Result<Option<CompositeSignal>, SignalError> {
        let composite = self.composite_signal_with_hint(series, ai_confidence)?;
        if let Some(c) = &composite {
            self.history.push(CompositeRecord {
                timestamp: c.signal.timestamp,
                direction: c.signal.direction,
                strength: c.signal.strength,
                confidence: c.signal.confidence,
                buy_score: c.buy_score,
                sell_score: c.sell_score,
            });
        }
        Ok(composite)
    }

    /// Adapt source weights from recorded win rates: above 0.6 grows the
    /// weight by 10%, below 0.4 shrinks it by 10%, clamped to [0.1, 2.0].
    /// Sources without recorded trades keep their weight. Never called
    /// implicitly during fusion.
    pub fn adapt_weights(&mut self) {
        for entry in &mut self.entries {
            if entry.trades == 0 {
                continue;
            }
            let win_rate = entry.win_rate();
            let factor = if win_rate > 0.6 {
                1.1
            } else if win_rate < 0.4 {
                0.9
            } else {
                continue;
            };
            let adjusted = (entry.weight * factor).clamp(MIN_WEIGHT, MAX_WEIGHT);
            tracing::debug!(
                name = entry.source.name(),
                win_rate,
                from = entry.weight,
                to = adjusted,
                "adapting source weight"
            );
            entry.weight = adjusted;
        }
    }
}

impl Default for StrategyTree {
    fn default() -> Self {
        Self::new()
    }
}
