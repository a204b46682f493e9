use serde::{Deserialize, Serialize};
use signal_core::{PricePoint, SignalError};

use crate::stroke::{Stroke, StrokeDirection};

/// Bars of history required before divergence is considered meaningful.
const MIN_DIVERGENCE_BARS: usize = 50;

/// Price/momentum disagreement across two same-direction strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divergence {
    /// Price made a lower low while momentum made a higher low
    Bullish,
    /// Price made a higher high while momentum made a lower high
    Bearish,
}

/// Compare the last two strokes' end prices against the oscillator values at
/// their end bars.
///
/// The pair must share a direction; stroke sequences built by
/// [`crate::stroke::build_strokes`] alternate, so this only fires on stroke
/// lists assembled elsewhere (e.g. filtered to one direction). An up pair
/// whose later high is not confirmed by the oscillator flags bearish
/// divergence; the down mirror flags bullish.
pub fn detect_divergence(
    series: &[PricePoint],
    strokes: &[Stroke],
) -> Result<Option<Divergence>, SignalError> {
    if strokes.len() < 2 || series.len() < MIN_DIVERGENCE_BARS {
        return Ok(None);
    }

    let latest = &strokes[strokes.len() - 1];
    let prior = &strokes[strokes.len() - 2];
    if latest.direction != prior.direction {
        return Ok(None);
    }

    let (Some(prior_bar), Some(latest_bar)) =
        (series.get(prior.end.index), series.get(latest.end.index))
    else {
        return Ok(None);
    };
    let prior_osc = prior_bar.macd()?;
    let latest_osc = latest_bar.macd()?;

    let divergence = match latest.direction {
        StrokeDirection::Up => {
            (latest.end.price > prior.end.price && latest_osc < prior_osc)
                .then_some(Divergence::Bearish)
        }
        StrokeDirection::Down => {
            (latest.end.price < prior.end.price && latest_osc > prior_osc)
                .then_some(Divergence::Bullish)
        }
    };
    Ok(divergence)
}
