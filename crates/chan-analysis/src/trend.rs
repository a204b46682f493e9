use serde::{Deserialize, Serialize};
use signal_core::{PricePoint, SignalError};

use crate::stroke::{Stroke, StrokeDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    Up,
    Down,
    Sideways,
}

/// Classify the trend from recent strokes and moving-average ordering.
///
/// The score is the mean of two votes: the majority direction of the last
/// three strokes (+1/-1, 0 on tie) and the moving-average stack on the latest
/// bar (+1 bullish short > medium > long, -1 bearish, 0 mixed). Above 0.5 is
/// up, below -0.5 is down. Fewer than three strokes is sideways, not an
/// error, and the indicators are not consulted in that case.
pub fn classify_trend(series: &[PricePoint], strokes: &[Stroke]) -> Result<TrendLabel, SignalError> {
    if strokes.len() < 3 {
        return Ok(TrendLabel::Sideways);
    }
    let Some(latest) = series.last() else {
        return Ok(TrendLabel::Sideways);
    };

    let recent = &strokes[strokes.len() - 3..];
    let ups = recent
        .iter()
        .filter(|s| s.direction == StrokeDirection::Up)
        .count();
    let downs = recent.len() - ups;
    let stroke_score = if ups > downs {
        1.0
    } else if downs > ups {
        -1.0
    } else {
        0.0
    };

    let ma_short = latest.ma_short()?;
    let ma_medium = latest.ma_medium()?;
    let ma_long = latest.ma_long()?;
    let ma_score = if ma_short > ma_medium && ma_medium > ma_long {
        1.0
    } else if ma_short < ma_medium && ma_medium < ma_long {
        -1.0
    } else {
        0.0
    };

    let score = (stroke_score + ma_score) / 2.0;
    Ok(if score > 0.5 {
        TrendLabel::Up
    } else if score < -0.5 {
        TrendLabel::Down
    } else {
        TrendLabel::Sideways
    })
}
