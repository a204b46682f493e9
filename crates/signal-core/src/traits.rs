use crate::{PricePoint, SignalError, TradingSignal};

/// A pluggable signal producer: given a price series, produce an optional
/// trading signal.
///
/// Implementations are synchronous and side-effect free; the same series must
/// always yield the same signal. Fusion bookkeeping (weight, enabled flag,
/// performance counters) lives with the strategy tree that registers the
/// source, not on the source itself.
pub trait SignalSource: Send + Sync {
    /// Registration key; unique within one strategy tree.
    fn name(&self) -> &str;

    /// Indicator fields this source reads from the input series. Absence of
    /// a listed field at evaluation time is a precondition violation and
    /// yields [`SignalError::MissingIndicator`].
    fn required_indicators(&self) -> &'static [&'static str];

    /// Evaluate the series. `Ok(None)` means "no evidence", including
    /// insufficient history; it is never an error.
    fn evaluate(&self, series: &[PricePoint]) -> Result<Option<TradingSignal>, SignalError>;
}
