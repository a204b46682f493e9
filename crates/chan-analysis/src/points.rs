use serde::{Deserialize, Serialize};

use crate::stroke::{Stroke, StrokeDirection};
use crate::trend::TrendLabel;

/// Golden-ratio retracement band accepted for type-2 points.
pub const RETRACE_MIN: f64 = 0.3;
pub const RETRACE_MAX: f64 = 0.618;

/// Buy/sell-point archetypes. Type-1 points are intentionally absent from
/// this design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Buy2,
    Buy3,
    Sell2,
    Sell3,
}

impl PointKind {
    pub fn is_buy(&self) -> bool {
        matches!(self, PointKind::Buy2 | PointKind::Buy3)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, PointKind::Sell2 | PointKind::Sell3)
    }
}

/// Classify the latest pullback/rebound against the trend.
///
/// In an up trend with the latest stroke down and the prior stroke up, the
/// pullback is a Buy2 when its retracement sits inside the golden band, and a
/// Buy3 when the two most recent up-strokes among the last four made a
/// strictly higher high. Down trends mirror to Sell2/Sell3. The two tests
/// are independent and may both fire. Without a confirmed trend nothing is
/// classified.
pub fn classify_points(strokes: &[Stroke], trend: TrendLabel) -> Vec<PointKind> {
    let mut points = Vec::new();
    if strokes.len() < 3 {
        return points;
    }

    let latest = &strokes[strokes.len() - 1];
    let prior = &strokes[strokes.len() - 2];

    match trend {
        TrendLabel::Up => {
            if latest.direction == StrokeDirection::Down && prior.direction == StrokeDirection::Up {
                if (RETRACE_MIN..=RETRACE_MAX).contains(&latest.strength) {
                    points.push(PointKind::Buy2);
                }
                if strokes.len() >= 4 && breaks_prior_extreme(strokes, StrokeDirection::Up) {
                    points.push(PointKind::Buy3);
                }
            }
        }
        TrendLabel::Down => {
            if latest.direction == StrokeDirection::Up && prior.direction == StrokeDirection::Down {
                if (RETRACE_MIN..=RETRACE_MAX).contains(&latest.strength) {
                    points.push(PointKind::Sell2);
                }
                if strokes.len() >= 4 && breaks_prior_extreme(strokes, StrokeDirection::Down) {
                    points.push(PointKind::Sell3);
                }
            }
        }
        TrendLabel::Sideways => {}
    }

    points
}

/// Did the last two same-direction strokes in the trailing four push past
/// the prior extreme (higher high for up, lower low for down)?
fn breaks_prior_extreme(strokes: &[Stroke], direction: StrokeDirection) -> bool {
    let window = &strokes[strokes.len().saturating_sub(4)..];
    let ends: Vec<f64> = window
        .iter()
        .filter(|s| s.direction == direction)
        .map(|s| s.end.price)
        .collect();

    if ends.len() < 2 {
        return false;
    }
    match direction {
        StrokeDirection::Up => ends[ends.len() - 1] > ends[ends.len() - 2],
        StrokeDirection::Down => ends[ends.len() - 1] < ends[ends.len() - 2],
    }
}
