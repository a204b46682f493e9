use chrono::{DateTime, Utc};
use signal_core::{Direction, SignalStrength, TradingSignal};

use crate::divergence::Divergence;
use crate::emotion::EmotionState;
use crate::points::PointKind;
use crate::position::RelativePosition;
use crate::trend::TrendLabel;

/// Base confidence before any evidence is weighed.
const BASE_CONFIDENCE: f64 = 0.5;

/// Merge the classification dimensions into one scored signal.
///
/// Confidence starts at 0.5 and moves additively: trend/point agreement
/// +0.2, favorable position +0.2 (unfavorable buy-high -0.1), confirming
/// divergence +0.15, extreme emotion +0.1 with the strength forced to
/// strong. Strength otherwise derives from the final confidence (>= 0.8
/// strong, >= 0.6 medium). A signal is emitted only when a direction was
/// established and the clamped confidence stays at or above 0.5; everything
/// else is "no signal". Absent dimensions (`None`) count as no evidence.
pub fn compose_signal(
    trend: TrendLabel,
    position: Option<RelativePosition>,
    points: &[PointKind],
    divergence: Option<Divergence>,
    emotion: Option<EmotionState>,
    timestamp: DateTime<Utc>,
) -> Option<TradingSignal> {
    let mut confidence = BASE_CONFIDENCE;
    let mut direction: Option<Direction> = None;
    let mut forced_strong = false;
    let mut reasons: Vec<String> = Vec::new();

    // 1. Trend and entry-point agreement
    let has_buy_point = points.iter().any(PointKind::is_buy);
    let has_sell_point = points.iter().any(PointKind::is_sell);
    if trend == TrendLabel::Up && has_buy_point {
        direction = Some(Direction::Buy);
        confidence += 0.2;
        reasons.push(format!("uptrend pullback with {}", describe_points(points)));
    } else if trend == TrendLabel::Down && has_sell_point {
        direction = Some(Direction::Sell);
        confidence += 0.2;
        reasons.push(format!("downtrend rebound with {}", describe_points(points)));
    }

    // 2. Relative-position adjustment
    if let (Some(dir), Some(pos)) = (direction, position) {
        match dir {
            Direction::Buy => {
                if pos <= RelativePosition::MediumLow {
                    confidence += 0.2;
                    reasons.push("price low in its range, wide safety margin".to_string());
                } else if pos == RelativePosition::High {
                    confidence -= 0.1;
                    reasons.push("price near range highs, caution".to_string());
                }
            }
            Direction::Sell => {
                if pos >= RelativePosition::MediumHigh {
                    confidence += 0.2;
                    reasons.push("price high in its range, limited upside".to_string());
                }
            }
        }
    }

    // 3. Divergence confirmation
    match (divergence, direction) {
        (Some(Divergence::Bullish), Some(Direction::Buy)) => {
            confidence += 0.15;
            reasons.push("bullish divergence confirms entry".to_string());
        }
        (Some(Divergence::Bearish), Some(Direction::Sell)) => {
            confidence += 0.15;
            reasons.push("bearish divergence confirms exit".to_string());
        }
        _ => {}
    }

    // 4. Emotion override: extreme readings force a strong signal
    if let (Some(em), Some(dir)) = (emotion, direction) {
        if em.extreme {
            match dir {
                Direction::Buy if em.oversold => {
                    confidence += 0.1;
                    forced_strong = true;
                    reasons.push(format!("oscillator extremely oversold ({:.1})", em.value));
                }
                Direction::Sell if em.overbought => {
                    confidence += 0.1;
                    forced_strong = true;
                    reasons.push(format!("oscillator extremely overbought ({:.1})", em.value));
                }
                _ => {}
            }
        }
    }

    // 5/6. Strength from confidence, then the emit gate
    let direction = direction?;
    let confidence = confidence.min(1.0);
    if confidence < BASE_CONFIDENCE {
        return None;
    }

    let strength = if forced_strong || confidence >= 0.8 {
        SignalStrength::Strong
    } else if confidence >= 0.6 {
        SignalStrength::Medium
    } else {
        SignalStrength::Weak
    };

    Some(TradingSignal::new(
        direction,
        strength,
        confidence,
        format!("chan composite: {}", reasons.join("; ")),
        timestamp,
    ))
}

fn describe_points(points: &[PointKind]) -> String {
    let labels: Vec<&str> = points
        .iter()
        .map(|p| match p {
            PointKind::Buy2 => "second buy point",
            PointKind::Buy3 => "third buy point",
            PointKind::Sell2 => "second sell point",
            PointKind::Sell3 => "third sell point",
        })
        .collect();
    labels.join(" + ")
}

/// Suggested position fraction for a composed signal.
///
/// `base_position * strength_mult * confidence * position_mult`, capped at
/// `max_position`. Strength scales 1.5/1.2/1.0; buying low scales 1.3 and
/// buying high 0.7. An unknown relative position contributes no adjustment.
pub fn position_size(
    signal: &TradingSignal,
    position: Option<RelativePosition>,
    base_position: f64,
    max_position: f64,
) -> f64 {
    let strength_mult = match signal.strength {
        SignalStrength::Strong => 1.5,
        SignalStrength::Medium => 1.2,
        SignalStrength::Weak => 1.0,
    };

    let position_mult = match (signal.direction, position) {
        (Direction::Buy, Some(RelativePosition::Low)) => 1.3,
        (Direction::Buy, Some(RelativePosition::High)) => 0.7,
        _ => 1.0,
    };

    (base_position * strength_mult * signal.confidence * position_mult).min(max_position)
}
